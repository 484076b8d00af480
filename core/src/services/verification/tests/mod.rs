
mod gate_tests;
