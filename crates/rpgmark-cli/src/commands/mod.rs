pub mod damage;
pub mod dot;
pub mod encode;
pub mod recover;
pub mod version;
