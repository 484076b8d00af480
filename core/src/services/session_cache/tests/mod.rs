
mod factory_tests;
mod hasher_tests;
