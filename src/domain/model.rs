use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key under which names are compared for uniqueness: trimmed, case-folded.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub franchise_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 分店與商品之間的庫存連結
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProduct {
    pub id: i64,
    pub branch_id: i64,
    pub product_id: i64,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Insert payloads; the store assigns identity and timestamps.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFranchise {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBranch {
    pub franchise_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBranchProduct {
    pub branch_id: i64,
    pub product_id: i64,
    pub stock: i32,
}

// Inbound requests. Fields stay optional so that absent values are rejected
// by the validator rather than by deserialization.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FranchiseRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRequest {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchRequest {
    pub franchise_id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BranchProductRequest {
    pub branch_id: Option<i64>,
    pub product_id: Option<i64>,
    pub stock: Option<i32>,
}

/// id + name projection used for franchises, products and embedded parents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub id: i64,
    pub name: String,
}

impl From<&Franchise> for Summary {
    fn from(franchise: &Franchise) -> Self {
        Self {
            id: franchise.id,
            name: franchise.name.clone(),
        }
    }
}

impl From<&Branch> for Summary {
    fn from(branch: &Branch) -> Self {
        Self {
            id: branch.id,
            name: branch.name.clone(),
        }
    }
}

impl From<&Product> for Summary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchView {
    pub id: i64,
    pub name: String,
    pub franchise: Summary,
}

impl BranchView {
    pub fn new(branch: &Branch, franchise: &Franchise) -> Self {
        Self {
            id: branch.id,
            name: branch.name.clone(),
            franchise: franchise.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProductView {
    pub id: i64,
    pub branch: Summary,
    pub product: Summary,
    pub stock: i32,
}

impl BranchProductView {
    pub fn new(link: &BranchProduct, branch: &Branch, product: &Product) -> Self {
        Self {
            id: link.id,
            branch: branch.into(),
            product: product.into(),
            stock: link.stock,
        }
    }
}

/// Raw row of the top-stock reporting query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopStockRow {
    pub branch_id: i64,
    pub branch_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub stock: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopStockEntry {
    pub branch: Summary,
    pub product: Summary,
    pub stock: i32,
}

impl From<TopStockRow> for TopStockEntry {
    fn from(row: TopStockRow) -> Self {
        Self {
            branch: Summary {
                id: row.branch_id,
                name: row.branch_name,
            },
            product: Summary {
                id: row.product_id,
                name: row.product_name,
            },
            stock: row.stock,
        }
    }
}
