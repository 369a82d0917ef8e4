mod filter_tests;
mod helpers;
mod reorder_tests;
mod sort_tests;
