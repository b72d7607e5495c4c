mod fixture_tests;
mod link_tests;
mod signal_tests;
