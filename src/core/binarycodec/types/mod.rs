//! Wire value types for the binary codec. These double as the
//! domain's primitive identifiers.

pub mod account_id;
pub mod amount;
pub mod blob;
pub mod currency;
pub mod exceptions;
pub mod hash128;
pub mod hash160;
pub mod hash256;
pub mod issue;
pub mod st_object;
pub mod vector256;

pub use self::account_id::AccountId;
pub use self::amount::IssuedValue;
pub use self::currency::Currency;
pub use self::hash128::Hash128;
pub use self::hash160::Hash160;
pub use self::hash256::Hash256;
pub use self::issue::Issue;
