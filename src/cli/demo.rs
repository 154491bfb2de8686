//! Demo command implementation
//!
//! Runs the example domain end to end: builds a catalog, places an order,
//! prints the invoice and parades the animal taxonomy. With `--crash` it
//! finishes by raising a deliberate error, useful for checking that errors
//! survive a minified production bundle of the equivalent demo app.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::domain::{
    menagerie, BusinessType, Catalog, Currency, OrderFactory, Organization, Person, PhoneNumber,
    Price, ProductFactory, Size,
};

/// Run the example store and zoo scenario
#[derive(Args, Debug)]
pub struct DemoCommand {
    /// Raise a deliberate error at the very end of the run
    #[arg(long)]
    pub crash: bool,
}

impl DemoCommand {
    pub fn execute(&self) -> Result<()> {
        let mut acme = Organization::tech_company("Acme", BusinessType::Ecommerce, "USA");
        acme.add_member(Person::new(1, "Ada"));
        acme.add_member(Person::new(2, "Grace"));
        // Duplicate id, silently ignored
        acme.add_member(Person::new(1, "Ada again"));

        println!("{}", acme.describe().bold());
        for member in acme.members() {
            println!("  {} {}", "•".dimmed(), member);
        }

        let mut products = ProductFactory::new();
        let shirt = products.t_shirt(
            "Logo Tee",
            acme.clone(),
            Price::new(1500, Currency::Usd)?,
            Size::Medium,
        );
        let mut phone = products.mobile_phone(
            "Brick 3000",
            acme.clone(),
            Price::new(49_900, Currency::Usd)?,
        );
        phone.insert_sim(PhoneNumber::new("47", "5551234")?)?;

        let mut catalog = Catalog::new("Acme Store");
        catalog.add(shirt);
        catalog.add(phone);

        println!("\n{} ({} products)", catalog.name().bold(), catalog.len());
        for product in catalog.products() {
            println!("  {} {}", "•".dimmed(), product);
        }

        let mut orders = OrderFactory::new();
        let mut order = orders.order();
        for product in catalog.products() {
            if !order.add_item(product, 2) {
                println!("  could not add {}", product.name());
            }
        }
        order.complete();

        println!("\n{}", order.invoice());

        println!("{}", "The zoo:".bold());
        for animal in menagerie() {
            println!("  {} {}", "•".dimmed(), animal.describe());
        }

        if self.crash {
            // Pedagogical artifact: prove that a failure at the end of the
            // run still surfaces with a readable message
            anyhow::bail!("deliberate demo error: everything above this line still ran");
        }

        Ok(())
    }
}
