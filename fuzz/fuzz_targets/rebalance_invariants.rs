#![no_main]
use libfuzzer_sys::fuzz_target;

use bst_avl::model::run_rebalance_invariants;

fuzz_target!(|keys: Vec<u32>| { run_rebalance_invariants(keys) });
