pub mod credentials;
pub mod mirror;
pub mod sites;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_support;
