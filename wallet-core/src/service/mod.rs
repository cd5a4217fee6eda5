pub mod collection_service;
pub mod error;

#[cfg(test)]
mod test;
