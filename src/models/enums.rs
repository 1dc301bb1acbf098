use serde::{Deserialize, Serialize};

/// Raised when a wire/query string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {field} value: {value}")]
pub struct UnknownEnumValue {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Literals are the portal's wire spellings (also used in query strings).
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(UnknownEnumValue {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(RequestStatus {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
    Completed => "COMPLETED",
});

str_enum!(DoseStatus {
    Pending => "PENDING",
    Taken => "TAKEN",
    Missed => "MISSED",
    Skipped => "SKIPPED",
});

str_enum!(ItemType {
    Tablet => "TABLET",
    Liquid => "LIQUID",
    Capsule => "CAPSULE",
    Cream => "CREAM",
    Powder => "POWDER",
    Injection => "INJECTION",
    Other => "OTHER",
});

impl RequestStatus {
    /// Only PENDING requests may be edited or deleted by a guardian.
    pub fn is_mutable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl DoseStatus {
    /// TAKEN/MISSED/SKIPPED are recorded outcomes; PENDING awaits one.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}
