pub mod certificate;
pub mod collection;
pub mod group;
pub mod record;
