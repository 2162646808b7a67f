pub mod interaction_service;

#[cfg(test)]
mod tests;
