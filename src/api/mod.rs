pub mod api;
pub(crate) mod dtos;
pub(crate) mod errors;
mod export_handler;
mod middlewares;
mod todos_handler;

#[cfg(test)]
mod test_support;
