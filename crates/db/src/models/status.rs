//! Status helper enums mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data (1-based) in the
//! corresponding `*_statuses` database table.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr => $label:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Seeded lookup-table name for this status.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Map a raw status ID back to the enum.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Hold lifecycle. HELD is the sole initial state; the other three are
    /// terminal and no transition ever leaves them.
    HoldStatus {
        Held = 1 => "HELD",
        Expired = 2 => "EXPIRED",
        Released = 3 => "RELEASED",
        Consumed = 4 => "CONSUMED",
    }
}

define_status_enum! {
    /// Purchase status. Purchases are immutable once written.
    PurchaseStatus {
        Sold = 1 => "SOLD",
    }
}

define_status_enum! {
    /// Payment authorization outcome.
    PaymentStatus {
        Authorized = 1 => "AUTHORIZED",
        Declined = 2 => "DECLINED",
    }
}
