#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKey {
    Code,
    Name,
    Category,
    Quantity,
    Begda,
    Verified,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 6] = [
        ColumnKey::Code,
        ColumnKey::Name,
        ColumnKey::Category,
        ColumnKey::Quantity,
        ColumnKey::Begda,
        ColumnKey::Verified,
    ];

    /// Columns the global keyword is matched against.
    pub const TEXT: [ColumnKey; 3] = [ColumnKey::Code, ColumnKey::Name, ColumnKey::Category];

    pub fn field(self) -> &'static str {
        match self {
            ColumnKey::Code => "code",
            ColumnKey::Name => "name",
            ColumnKey::Category => "category",
            ColumnKey::Quantity => "quantity",
            ColumnKey::Begda => "begda",
            ColumnKey::Verified => "verified",
        }
    }

    pub fn input_kind(self) -> FilterInputKind {
        match self {
            ColumnKey::Code | ColumnKey::Name | ColumnKey::Category => FilterInputKind::Text,
            ColumnKey::Quantity => FilterInputKind::Numeric,
            ColumnKey::Begda => FilterInputKind::Date,
            ColumnKey::Verified => FilterInputKind::TriState,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterInputKind {
    Text,
    Numeric,
    Date,
    TriState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub key: ColumnKey,
    pub header: &'static str,
    pub sortable: bool,
    pub filterable: bool,
    pub input: FilterInputKind,
    pub width: &'static str,
}

impl ColumnDef {
    fn new(key: ColumnKey, header: &'static str, width: &'static str) -> Self {
        Self {
            key,
            header,
            sortable: true,
            filterable: true,
            input: key.input_kind(),
            width,
        }
    }
}

pub fn product_columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new(ColumnKey::Code, "Code", "25%"),
        ColumnDef::new(ColumnKey::Name, "Name", "25%"),
        ColumnDef::new(ColumnKey::Category, "Category", "25%"),
        ColumnDef::new(ColumnKey::Quantity, "Quantity", "15%"),
        ColumnDef::new(ColumnKey::Begda, "Date", "10%"),
        ColumnDef::new(ColumnKey::Verified, "Verified", "10%"),
    ]
}

pub fn column_def(key: ColumnKey) -> Option<ColumnDef> {
    product_columns().into_iter().find(|def| def.key == key)
}
