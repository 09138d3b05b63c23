//! Products and reviews.

use hawk_leather_core::{Gender, ProductId};
use hawk_leather_storefront::Storefront;
use hawk_leather_storefront::models::{Product, ProductFilter, product_page};

use crate::console::{print_page_footer, stars};
use crate::error::CliError;

/// List products, filtered locally by category and audience.
pub async fn products(
    store: &mut Storefront,
    category: Option<String>,
    gender: Option<Gender>,
    page: usize,
) -> Result<(), CliError> {
    store.catalog().load(None, None).await?;

    let catalog = store.catalog_state();
    let filter = ProductFilter { category, gender };
    let products = catalog.filtered(&filter);
    let page = product_page(&products, page);

    println!("Categories: {}", catalog.categories().join(", "));
    println!();

    if page.items.is_empty() {
        println!("No products found");
        return Ok(());
    }

    for product in page.items {
        print_product_line(product);
    }
    print_page_footer(&page);
    Ok(())
}

fn print_product_line(product: &Product) {
    let stock = if product.in_stock { "" } else { "  (out of stock)" };
    if product.has_discount() {
        println!(
            "{}  {}  {} (was {}, {}% off){stock}",
            product.id,
            product.name,
            product.payable_price().display(),
            product.list_price().display(),
            product.discount.normalize(),
        );
    } else {
        println!(
            "{}  {}  {}{stock}",
            product.id,
            product.name,
            product.payable_price().display()
        );
    }
}

/// Show one product in full.
pub async fn product(store: &mut Storefront, id: &str) -> Result<(), CliError> {
    let product = store.catalog().product(&ProductId::new(id)).await?;

    println!("{}", product.name);
    match product.gender {
        Some(gender) => println!("{} · {gender}", product.category),
        None => println!("{}", product.category),
    }
    println!();
    if product.has_discount() {
        println!(
            "{}  (MRP {}, {}% off)",
            product.payable_price().display(),
            product.list_price().display(),
            product.discount.normalize()
        );
    } else {
        println!("{}", product.payable_price().display());
    }
    println!("{}", if product.in_stock { "In stock" } else { "Out of stock" });

    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    if !product.features.is_empty() {
        println!();
        for feature in &product.features {
            println!("  - {feature}");
        }
    }
    Ok(())
}

/// Show a page of reviews.
pub async fn reviews(store: &mut Storefront, page: usize) -> Result<(), CliError> {
    store.reviews().load().await?;
    let testimonials = store.testimonials();

    let Some(average) = testimonials.average_rating() else {
        println!("No reviews yet");
        return Ok(());
    };
    println!(
        "{average:.1} out of 5 from {} reviews",
        testimonials.reviews().len()
    );

    let page = testimonials.page(page);
    for review in page.items {
        println!();
        println!("{}  {}", stars(review.rating), review.created_at.format("%d %b %Y"));
        println!("\"{}\"", review.comment);
        if review.author_occupation.is_empty() {
            println!("  [{}] {}", review.initials, review.author_name);
        } else {
            println!(
                "  [{}] {}, {}",
                review.initials, review.author_name, review.author_occupation
            );
        }
    }
    print_page_footer(&page);
    Ok(())
}

/// Post a review.
pub async fn review(store: &mut Storefront, rating: u8, comment: &str) -> Result<(), CliError> {
    store.reviews().add(rating, comment).await?;
    Ok(())
}
