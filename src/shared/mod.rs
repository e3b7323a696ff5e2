pub mod constants;
pub mod templates;
#[cfg(test)]
pub mod test_helpers;
pub mod timezone;
pub mod validation;
