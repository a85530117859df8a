pub mod constants;
pub mod geo;
pub mod lenient;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
