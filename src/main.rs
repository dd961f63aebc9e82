use bst_hashtable::{FnStrategy, OrdStrategy, Table};
use std::fmt;

fn int_clone(k: &u32) -> u32 {
    *k
}

fn int_hash(k: &u32, bit_width: u32) -> usize {
    (*k as usize) & ((1 << bit_width) - 1)
}

fn int_compare(a: &u32, b: &u32) -> std::cmp::Ordering {
    a.cmp(b)
}

fn int_destroy(_k: u32) {}

fn int_print(k: &u32, out: &mut dyn fmt::Write) -> fmt::Result {
    write!(out, "{k}")
}

fn main() {
    env_logger::Builder::from_default_env().init();

    // k mod 4 over four slots
    let strategy = FnStrategy::new(int_clone, int_hash, int_compare, int_destroy, int_print);
    let mut table = Table::new(strategy, 2);

    for k in [1u32, 5, 3, 9] {
        println!("insert {k}: {:?}", table.insert(&k));
    }
    println!("insert 5 again: {:?}", table.insert(&5));
    table.print(); // 1: [0-1,1-5,2-9]

    println!("remove 5: {:?}", table.remove(&5));
    println!("remove 2: {:?}", table.remove(&2));
    table.print(); // 1: [0-1,1-9]
    table.destroy();

    let mut words = Table::new(OrdStrategy::<String>::new(), 3);
    for w in ["bucket", "level", "node", "slot", "tree"] {
        let _ = words.insert(&w.to_string());
    }
    let _ = words.remove(&"node".to_string());
    words.print();
}
