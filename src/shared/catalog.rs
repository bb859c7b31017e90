//! Catalog Data Structures
//!
//! Products as listed by the catalog endpoint and the cart lines persisted
//! locally for them.

use serde::{Deserialize, Serialize};

/// Product identifier as issued by the API
pub type ProductId = i64;

/// A product in the catalog listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    /// Price handed to the cart
    #[serde(default)]
    pub preco: f64,
    /// Price shown on the listing card
    #[serde(default)]
    pub preco_venda: Option<f64>,
    #[serde(default)]
    pub imagem_url: Option<String>,
}

impl Product {
    /// Price recorded when the product is added to the cart.
    ///
    /// This is `preco`, not the displayed `preco_venda`. The two are kept
    /// apart until the API owners say which one is authoritative.
    pub fn cart_price(&self) -> f64 {
        self.preco
    }

    /// Price displayed on the listing card, falling back to `preco`
    pub fn display_price(&self) -> f64 {
        self.preco_venda.unwrap_or(self.preco)
    }
}

/// Format a price the way the storefront shows it: `R$ 12,50`
pub fn format_price(value: f64) -> String {
    format!("R$ {:.2}", value).replace('.', ",")
}

/// One line of the persisted cart.
///
/// Stored under `carrinho` with the web storefront's field names (`nome`,
/// `preco`, `quantidade`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub id: ProductId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "preco", default)]
    pub price: f64,
    /// Older entries may lack a quantity
    #[serde(rename = "quantidade", default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl CartItem {
    /// A fresh cart line with quantity 1
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity: Some(1),
        }
    }

    /// Quantity as counted by the cart badge; a missing quantity counts as 0
    pub fn counted_quantity(&self) -> u32 {
        self.quantity.unwrap_or(0)
    }

    /// Add one unit. A missing quantity is taken as 1 before incrementing.
    pub fn increment(&mut self) {
        self.quantity = Some(self.quantity.unwrap_or(1).saturating_add(1));
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.counted_quantity())
    }
}
