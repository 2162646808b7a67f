pub mod admin_service;

#[cfg(test)]
mod tests;
