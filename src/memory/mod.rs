pub mod image;
pub mod locator;
