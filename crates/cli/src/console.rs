//! Terminal input and output.

use std::io::Write;

use rust_decimal::Decimal;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use hawk_leather_core::{Page, PageMarker, Price};
use hawk_leather_storefront::notify::{Notice, NoticeLevel, Notifier};
use hawk_leather_storefront::services::{
    GatewayOutcome, PaymentCallback, PaymentGateway, PaymentRequest,
};

use crate::error::CliError;

/// Prints notices as they happen: successes to stdout, errors to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Info => println!("• {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

/// Line-based prompts on stdin.
pub struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask for one line, without the trailing newline.
    pub async fn ask(&mut self, label: &str) -> Result<String, CliError> {
        print!("{label}: ");
        std::io::stdout().flush()?;
        self.lines
            .next_line()
            .await?
            .map(|line| line.trim_end_matches('\r').to_string())
            .ok_or(CliError::InputClosed)
    }

    /// Ask for a line, keeping `current` when the answer is blank.
    pub async fn ask_or_keep(&mut self, label: &str, current: &str) -> Result<String, CliError> {
        let answer = if current.is_empty() {
            self.ask(label).await?
        } else {
            self.ask(&format!("{label} [{current}]")).await?
        };
        if answer.trim().is_empty() {
            Ok(current.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Ask for a secret. The terminal still echoes it; the value is only
    /// wrapped so it never lands in logs.
    pub async fn ask_secret(&mut self, label: &str) -> Result<SecretString, CliError> {
        Ok(SecretString::from(self.ask(label).await?))
    }

    /// Yes/no question, defaulting to no.
    pub async fn confirm(&mut self, question: &str) -> Result<bool, CliError> {
        let answer = self.ask(&format!("{question} [y/N]")).await?;
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }
}

/// Collects payment by asking the customer for the gateway's callback values.
///
/// Paying happens out of band; the customer pastes the payment ID and
/// signature shown by the gateway. A blank payment ID dismisses the payment.
pub struct ConsoleGateway<'a> {
    console: &'a mut Console,
}

impl<'a> ConsoleGateway<'a> {
    pub const fn new(console: &'a mut Console) -> Self {
        Self { console }
    }

    async fn read_callback(&mut self, request: &PaymentRequest) -> Result<GatewayOutcome, CliError> {
        let amount = Price::new(Decimal::new(request.amount_minor, 2), request.currency);
        println!();
        println!("{} - {}", request.name, request.description);
        println!("  Amount:        {}", amount.display());
        println!("  Gateway order: {}", request.gateway_order_id);
        println!("  Merchant key:  {}", request.key_id);
        if !request.prefill.email.is_empty() {
            println!("  Paying as:     {} <{}>", request.prefill.name, request.prefill.email);
        }
        println!();

        let payment_id = self.console.ask("Payment ID (blank to cancel)").await?;
        if payment_id.trim().is_empty() {
            return Ok(GatewayOutcome::Dismissed);
        }
        let signature = self.console.ask("Payment signature").await?;

        Ok(GatewayOutcome::Completed(PaymentCallback {
            gateway_order_id: request.gateway_order_id.clone(),
            payment_id: payment_id.trim().to_string(),
            signature: signature.trim().to_string(),
        }))
    }
}

impl PaymentGateway for ConsoleGateway<'_> {
    async fn collect(&mut self, request: &PaymentRequest) -> GatewayOutcome {
        match self.read_callback(request).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, "Payment prompt failed");
                GatewayOutcome::Unavailable
            }
        }
    }
}

/// One-line page navigator, e.g. `Page 2 of 7: 1 [2] 3 4 … 7`.
pub fn page_footer<T>(page: &Page<'_, T>) -> Option<String> {
    if !page.needs_navigation() {
        return None;
    }
    let markers: Vec<String> = page
        .page_numbers()
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if n == page.current => format!("[{n}]"),
            PageMarker::Page(n) => n.to_string(),
            PageMarker::Gap => "…".to_string(),
        })
        .collect();
    Some(format!(
        "Page {} of {}: {}",
        page.current,
        page.total_pages,
        markers.join(" ")
    ))
}

/// Print the navigator if there is more than one page.
pub fn print_page_footer<T>(page: &Page<'_, T>) {
    if let Some(footer) = page_footer(page) {
        println!();
        println!("{footer}");
    }
}

/// Star rating as text, e.g. `★★★★☆`.
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
