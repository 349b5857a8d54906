use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, ProductIdentifier};

/// Bookkeeping owned by the persistence layer.
///
/// Stores stamp these on insert/update/delete; domain code only reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl AuditFields {
    /// Audit state of a row that has just been inserted.
    pub fn inserted(at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            last_modified_at: None,
            is_active: true,
        }
    }

    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.last_modified_at = Some(at);
    }

    pub fn deactivate(&mut self, at: DateTime<Utc>) {
        self.is_active = false;
        self.last_modified_at = Some(at);
    }
}

/// Catalog product.
///
/// The identifier is assigned once at creation and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductIdentifier,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    #[serde(rename = "stock_available")]
    pub stock: i64,
    #[serde(skip)]
    pub audit: AuditFields,
}

impl Product {
    /// Build a not-yet-persisted product from validated creation fields.
    pub fn new(product_id: ProductIdentifier, fields: NewProduct) -> Self {
        Self {
            product_id,
            name: fields.name,
            description: fields.description,
            unit_price: fields.unit_price,
            stock: fields.stock,
            audit: AuditFields::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.audit.is_active
    }

    /// Move stock in the given direction.
    ///
    /// No floor: decrementing past zero leaves a negative count.
    pub fn adjust_stock(&mut self, direction: StockDirection, amount: i64) {
        self.stock = direction.apply(self.stock, amount);
    }
}

/// Fields supplied by the caller when creating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub stock: i64,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("Product name cannot be empty."));
        }
        ensure_price(self.unit_price)?;
        if self.stock < 0 {
            return Err(DomainError::validation("Stock cannot be negative."));
        }
        Ok(())
    }
}

/// Partial update.
///
/// `None` and blank-after-trim strings both mean "leave unchanged"; there is no
/// way to clear a field through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
}

impl ProductPatch {
    /// Apply the patch in place. On error the product is left untouched.
    pub fn apply_to(&self, product: &mut Product) -> DomainResult<()> {
        if let Some(price) = self.unit_price {
            ensure_price(price)?;
        }

        if let Some(name) = provided(&self.name) {
            product.name = name.to_string();
        }
        if let Some(description) = provided(&self.description) {
            product.description = Some(description.to_string());
        }
        if let Some(price) = self.unit_price {
            product.unit_price = price;
        }
        Ok(())
    }
}

fn provided(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.trim().is_empty())
}

fn ensure_price(price: Decimal) -> DomainResult<()> {
    if price < Decimal::ZERO {
        return Err(DomainError::validation("Unit price cannot be negative."));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    Increment,
    Decrement,
}

impl StockDirection {
    pub fn apply(self, stock: i64, amount: i64) -> i64 {
        match self {
            StockDirection::Increment => stock.saturating_add(amount),
            StockDirection::Decrement => stock.saturating_sub(amount),
        }
    }
}
