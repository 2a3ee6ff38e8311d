use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Category of a catalog object.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Database,
    Table,
    View,
    Function,
    Procedure,
    Trigger,
    Sequence,
    Synonym,
    Package,
    Type,
    Other,
}

/// Sub-folder of a backup or scripting target. Each kind maps to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display)]
pub enum ScriptFolder {
    Database,
    Tables,
    Views,
    Functions,
    Procedures,
    Other,
}

impl ScriptFolder {
    pub const ALL: [ScriptFolder; 6] = [
        ScriptFolder::Database,
        ScriptFolder::Tables,
        ScriptFolder::Views,
        ScriptFolder::Functions,
        ScriptFolder::Procedures,
        ScriptFolder::Other,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            ScriptFolder::Database => "database",
            ScriptFolder::Tables => "tables",
            ScriptFolder::Views => "views",
            ScriptFolder::Functions => "functions",
            ScriptFolder::Procedures => "procedures",
            ScriptFolder::Other => "other",
        }
    }

    /// Type name understood by the scripting tool's `--include-types`.
    /// The catch-all folder has none and is scripted by excluding the others.
    pub fn scripter_type(&self) -> Option<&'static str> {
        match self {
            ScriptFolder::Database => Some("Database"),
            ScriptFolder::Tables => Some("Table"),
            ScriptFolder::Views => Some("View"),
            ScriptFolder::Functions => Some("UserDefinedFunction"),
            ScriptFolder::Procedures => Some("StoredProcedure"),
            ScriptFolder::Other => None,
        }
    }

    /// Scripter type names of every folder except the catch-all.
    pub fn named_scripter_types() -> Vec<&'static str> {
        Self::ALL.iter().filter_map(|f| f.scripter_type()).collect()
    }
}

impl ObjectKind {
    /// Maps a catalog type code to a kind. Accepts Oracle `OBJECT_TYPE`
    /// values as well as SQL Server `sys.objects.type` codes; anything
    /// unrecognized becomes `Other`.
    pub fn from_catalog(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "DATABASE" => ObjectKind::Database,
            "TABLE" | "U" | "USER_TABLE" => ObjectKind::Table,
            "VIEW" | "V" | "MATERIALIZED VIEW" => ObjectKind::View,
            "FUNCTION" | "FN" | "IF" | "TF" | "FS" | "FT" | "AF" => ObjectKind::Function,
            "PROCEDURE" | "P" | "PC" | "X" => ObjectKind::Procedure,
            "TRIGGER" | "TR" | "TA" => ObjectKind::Trigger,
            "SEQUENCE" | "SO" => ObjectKind::Sequence,
            "SYNONYM" | "SN" => ObjectKind::Synonym,
            "PACKAGE" | "PACKAGE BODY" => ObjectKind::Package,
            "TYPE" | "TYPE BODY" | "TT" => ObjectKind::Type,
            _ => ObjectKind::Other,
        }
    }

    pub fn folder(&self) -> ScriptFolder {
        match self {
            ObjectKind::Database => ScriptFolder::Database,
            ObjectKind::Table => ScriptFolder::Tables,
            ObjectKind::View => ScriptFolder::Views,
            ObjectKind::Function => ScriptFolder::Functions,
            ObjectKind::Procedure => ScriptFolder::Procedures,
            ObjectKind::Trigger
            | ObjectKind::Sequence
            | ObjectKind::Synonym
            | ObjectKind::Package
            | ObjectKind::Type
            | ObjectKind::Other => ScriptFolder::Other,
        }
    }

    /// Whether the catalog keeps a retrievable source body for this kind.
    pub fn has_definition(&self) -> bool {
        matches!(
            self,
            ObjectKind::View
                | ObjectKind::Function
                | ObjectKind::Procedure
                | ObjectKind::Trigger
                | ObjectKind::Package
        )
    }

    /// Catalog type name used when asking the database for a definition.
    pub fn catalog_name(&self) -> &'static str {
        match self {
            ObjectKind::Database => "DATABASE",
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Trigger => "TRIGGER",
            ObjectKind::Sequence => "SEQUENCE",
            ObjectKind::Synonym => "SYNONYM",
            ObjectKind::Package => "PACKAGE",
            ObjectKind::Type => "TYPE",
            ObjectKind::Other => "OTHER",
        }
    }
}
