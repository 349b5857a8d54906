use rust_decimal::Decimal;
use serde::Deserialize;

use catalog_products::{NewProduct, ProductPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Decimal,
    #[serde(default, alias = "stock_available")]
    pub stock: i64,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(value: CreateProductRequest) -> Self {
        NewProduct {
            name: value.name,
            description: value.description,
            unit_price: value.unit_price,
            stock: value.stock,
        }
    }
}

/// Every field is optional; absent or blank fields leave the product unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(value: UpdateProductRequest) -> Self {
        ProductPatch {
            name: value.name,
            description: value.description,
            unit_price: value.unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_either_stock_field_name() {
        let a: CreateProductRequest =
            serde_json::from_str(r#"{"name":"A","unit_price":10.99,"stock":3}"#).unwrap();
        let b: CreateProductRequest =
            serde_json::from_str(r#"{"name":"B","unit_price":1,"stock_available":4}"#).unwrap();

        assert_eq!(a.stock, 3);
        assert_eq!(a.unit_price, Decimal::new(1099, 2));
        assert_eq!(a.description, None);
        assert_eq!(b.stock, 4);
    }

    #[test]
    fn update_request_fields_are_optional() {
        let req: UpdateProductRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(ProductPatch::from(req), ProductPatch::default());
    }
}
