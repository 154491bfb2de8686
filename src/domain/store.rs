//! Products, catalogs and orders
//!
//! Prices are integer minor units (cents), never floats. Product and order
//! identifiers come from explicit sequence generators owned by factories
//! instead of the static counters the original used.

use std::cell::OnceCell;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::error::{DomainError, DomainResult};
use super::people::Organization;

/// Supported currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A strictly positive monetary value in minor units plus its currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Price {
    minor: i64,
    currency: Currency,
}

impl Price {
    /// Construct a price; non-positive values always fail
    pub fn new(minor: i64, currency: Currency) -> DomainResult<Self> {
        if minor <= 0 {
            return Err(DomainError::NonPositivePrice(minor));
        }
        Ok(Self { minor, currency })
    }

    pub fn minor(&self) -> i64 {
        self.minor
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.minor, self.currency))
    }
}

/// Render a minor-unit amount with its currency code, e.g. "10.00 USD"
pub fn format_amount(minor: i64, currency: Currency) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    format!(
        "{}{}.{:02} {}",
        sign,
        (minor / 100).abs(),
        (minor % 100).abs(),
        currency
    )
}

/// A phone number: non-empty country code plus an all-digit subscriber part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber {
    country_code: String,
    subscriber: String,
}

impl PhoneNumber {
    pub fn new(country_code: impl Into<String>, subscriber: impl Into<String>) -> DomainResult<Self> {
        let country_code = country_code.into();
        let subscriber = subscriber.into();

        if country_code.trim().is_empty() {
            return Err(DomainError::EmptyCountryCode);
        }
        if subscriber.is_empty() || !subscriber.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::NonNumericSubscriber(subscriber));
        }

        Ok(Self {
            country_code,
            subscriber,
        })
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} {}", self.country_code, self.subscriber)
    }
}

/// Monotonic identifier generator; owned by a factory, never static
#[derive(Debug, Clone)]
pub struct Sequence {
    next: u64,
}

impl Sequence {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// T-shirt sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Size {
    Small,
    Medium,
    Large,
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Size::Small => "S",
            Size::Medium => "M",
            Size::Large => "L",
        };
        f.write_str(s)
    }
}

/// Product variants; the original's subclass hierarchy as a tagged enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKind {
    Standard,
    TShirt { size: Size },
    MobilePhone { sim: Option<PhoneNumber> },
}

/// A priced product owned by an organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: u64,
    name: String,
    maker: Organization,
    price: Price,
    kind: ProductKind,
}

impl Product {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn maker(&self) -> &Organization {
        &self.maker
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// Insert a SIM into a phone; anything else has no slot
    pub fn insert_sim(&mut self, number: PhoneNumber) -> DomainResult<()> {
        match &mut self.kind {
            ProductKind::MobilePhone { sim } => {
                *sim = Some(number);
                Ok(())
            }
            _ => Err(DomainError::NoSimSlot(self.name.clone())),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{}) {}", self.name, self.id, self.price)
    }
}

/// Factory owning the product id sequence
#[derive(Debug)]
pub struct ProductFactory {
    seq: Sequence,
}

impl Default for ProductFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductFactory {
    pub fn new() -> Self {
        Self {
            seq: Sequence::starting_at(1),
        }
    }

    pub fn product(&mut self, name: impl Into<String>, maker: Organization, price: Price) -> Product {
        self.build(name, maker, price, ProductKind::Standard)
    }

    pub fn t_shirt(
        &mut self,
        name: impl Into<String>,
        maker: Organization,
        price: Price,
        size: Size,
    ) -> Product {
        self.build(name, maker, price, ProductKind::TShirt { size })
    }

    pub fn mobile_phone(
        &mut self,
        name: impl Into<String>,
        maker: Organization,
        price: Price,
    ) -> Product {
        self.build(name, maker, price, ProductKind::MobilePhone { sim: None })
    }

    fn build(
        &mut self,
        name: impl Into<String>,
        maker: Organization,
        price: Price,
        kind: ProductKind,
    ) -> Product {
        Product {
            id: self.seq.next(),
            name: name.into(),
            maker,
            price,
            kind,
        }
    }
}

/// A named product collection with lookup by product id (linear scan)
#[derive(Debug, Default)]
pub struct Catalog {
    name: String,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            products: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// The unique product with this id, or nothing
    pub fn find(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id() == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// One order line: a product snapshot and a positive quantity
#[derive(Debug, Clone)]
pub struct LineItem {
    product: Product,
    quantity: i64,
}

impl LineItem {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn subtotal_minor(&self) -> i64 {
        self.product.price().minor() * self.quantity
    }
}

/// An order accumulating line items until completed.
///
/// The total is computed lazily and cached on first read or at completion;
/// it stays stable afterwards even when more items are added to a
/// not-yet-completed order. That staleness is the original's documented
/// cached-on-first-read semantics, kept as is.
#[derive(Debug)]
pub struct Order {
    id: u64,
    lines: Vec<LineItem>,
    completed: bool,
    total: OnceCell<i64>,
}

impl Order {
    fn new(id: u64) -> Self {
        Self {
            id,
            lines: Vec::new(),
            completed: false,
            total: OnceCell::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Add a line item.
    ///
    /// This is the one call site that converts validation failure into a
    /// boolean instead of propagating it; the asymmetry with the throwing
    /// constructors is deliberate and kept from the original.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> bool {
        if self.completed || quantity <= 0 {
            return false;
        }
        self.lines.push(LineItem {
            product: product.clone(),
            quantity,
        });
        true
    }

    /// Complete the order: no further items, total fixed from here on
    pub fn complete(&mut self) {
        self.completed = true;
        let _ = self.total_minor();
    }

    /// Order total in minor units, cached after the first computation
    pub fn total_minor(&self) -> i64 {
        *self
            .total
            .get_or_init(|| self.lines.iter().map(LineItem::subtotal_minor).sum())
    }

    /// Currency of the order, taken from its first line
    pub fn currency(&self) -> Option<Currency> {
        self.lines.first().map(|l| l.product().price().currency())
    }

    /// Render the invoice: one line per item with subtotal and currency,
    /// then the grand total
    pub fn invoice(&self) -> String {
        let mut out = format!("Invoice for order #{}\n", self.id);
        for line in &self.lines {
            let currency = line.product().price().currency();
            out.push_str(&format!(
                "  {} x {} @ {} = {}\n",
                line.quantity(),
                line.product().name(),
                line.product().price(),
                format_amount(line.subtotal_minor(), currency),
            ));
        }
        let currency = self.currency().unwrap_or(Currency::Usd);
        out.push_str(&format!(
            "  total: {}\n",
            format_amount(self.total_minor(), currency)
        ));
        out
    }
}

/// Factory owning the order id sequence.
///
/// The original seeded its counter from a random base per process; here the
/// base comes from process start time, which keeps ids non-repeating across
/// runs without persisting anything.
#[derive(Debug)]
pub struct OrderFactory {
    seq: Sequence,
}

impl Default for OrderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderFactory {
    pub fn new() -> Self {
        let base = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64 % 900_000 + 100_000)
            .unwrap_or(100_000);
        Self {
            seq: Sequence::starting_at(base),
        }
    }

    /// Fixed base, for deterministic tests
    pub fn starting_at(base: u64) -> Self {
        Self {
            seq: Sequence::starting_at(base),
        }
    }

    pub fn order(&mut self) -> Order {
        Order::new(self.seq.next())
    }
}
