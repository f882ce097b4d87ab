/// Operation kinds
///
/// Purchase of a security. Increases quantity and cost basis.
pub const OPERATION_KIND_BUY: &str = "buy";

/// Disposal of a security. Decreases quantity; net proceeds leave the cost basis.
pub const OPERATION_KIND_SELL: &str = "sell";

/// Portuguese aliases accepted from the dashboard's import files.
pub const OPERATION_KIND_BUY_ALIASES: [&str; 2] = ["compra", "c"];
pub const OPERATION_KIND_SELL_ALIASES: [&str; 2] = ["venda", "v"];

/// Asset types
pub const ASSET_TYPE_STOCK: &str = "stock";
pub const ASSET_TYPE_REIT: &str = "reit";
pub const ASSET_TYPE_FIXED_INCOME: &str = "fixed_income";
pub const ASSET_TYPE_ETF: &str = "etf";
pub const ASSET_TYPE_FUND: &str = "fund";
pub const ASSET_TYPE_CRYPTO: &str = "crypto";
