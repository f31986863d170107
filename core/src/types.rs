//! Shared primitive types used across generation and analysis.

/// An 8-digit numeric surrogate key (accounts, users, vehicles, ...).
pub type RecordId = i64;

/// The ten tables, in generation order.
///
/// The discriminant doubles as the RNG slot for the table's generation
/// step. NEVER reorder or remove entries: reordering changes every
/// table's random stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum Table {
    Accounts         = 0,
    AccountProfiles  = 1,
    ServicePoints    = 2,
    Contracts        = 3,
    Users            = 4,
    AssetTags        = 5,
    Vehicles         = 6,
    UserVehicleLinks = 7,
    Transactions     = 8,
    TransactionItems = 9,
}

impl Table {
    pub const ALL: [Table; 10] = [
        Table::Accounts,
        Table::AccountProfiles,
        Table::ServicePoints,
        Table::Contracts,
        Table::Users,
        Table::AssetTags,
        Table::Vehicles,
        Table::UserVehicleLinks,
        Table::Transactions,
        Table::TransactionItems,
    ];

    /// The SQL table name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Accounts         => "table_a",
            Self::AccountProfiles  => "table_b",
            Self::ServicePoints    => "table_c",
            Self::Contracts        => "table_d",
            Self::Users            => "table_e",
            Self::AssetTags        => "table_f",
            Self::Vehicles         => "table_g",
            Self::UserVehicleLinks => "table_h",
            Self::Transactions     => "table_i",
            Self::TransactionItems => "table_j",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Accounts         => "accounts",
            Self::AccountProfiles  => "account profiles",
            Self::ServicePoints    => "service points",
            Self::Contracts        => "contracts",
            Self::Users            => "users",
            Self::AssetTags        => "asset tags",
            Self::Vehicles         => "vehicles",
            Self::UserVehicleLinks => "user-vehicle links",
            Self::Transactions     => "transactions",
            Self::TransactionItems => "transaction items",
        }
    }
}
