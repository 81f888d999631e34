mod derive;
pub use derive::*;

mod error;
pub use error::*;

mod schema;
pub use schema::*;

mod value;
pub use value::*;
