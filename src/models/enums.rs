use serde::{Deserialize, Serialize};

/// Parse failure for a string-backed enum.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {field}: {value}")]
pub struct InvalidEnum {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(BookingStatus {
    Upcoming => "upcoming",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl BookingStatus {
    /// Terminal statuses admit no further lifecycle moves.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Upcoming)
    }

    /// Valid lifecycle moves: upcoming -> completed, upcoming -> cancelled.
    /// Nothing returns to upcoming, and nothing leaves a terminal status.
    pub fn can_become(self, next: Self) -> bool {
        matches!((self, next), (Self::Upcoming, Self::Completed | Self::Cancelled))
    }
}
