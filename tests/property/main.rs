// tests/property/main.rs

mod sort;
