//! Runs the classic 80% contains / 10% add / 10% remove workload once
//! serially and once spread across a rayon thread pool, and prints how
//! long each took.

use std::time::Instant;

use cuckoo_set::CuckooSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPoolBuilder;

const CAPACITY: usize = 12_000;
const KEY_MAX: u64 = 1_500;
const INITIAL_SIZE: u64 = KEY_MAX / 2;
const OPS_PER_WORKER: usize = 200_000;
const NUM_THREADS: usize = 8;

#[derive(Clone, Copy)]
enum Op {
    Contains(u64),
    Add(u64),
    Remove(u64),
}

fn generate_ops(rng: &mut StdRng, count: usize) -> Vec<Op> {
    (0..count)
        .map(|_| {
            let roll = rng.gen_range(0..100);
            let key = rng.gen_range(0..KEY_MAX);
            if roll < 80 {
                Op::Contains(key)
            } else if roll < 90 {
                Op::Add(key)
            } else {
                Op::Remove(key)
            }
        })
        .collect()
}

fn run_serial() -> u128 {
    let set = CuckooSet::new(CAPACITY).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    set.populate(0..INITIAL_SIZE);

    let ops = generate_ops(&mut rng, OPS_PER_WORKER * NUM_THREADS);
    let start = Instant::now();
    for op in ops {
        apply(&set, op);
    }
    start.elapsed().as_millis()
}

fn run_concurrent() -> u128 {
    let set = CuckooSet::new(CAPACITY).unwrap();
    set.populate(0..INITIAL_SIZE);

    let pool = ThreadPoolBuilder::new()
        .num_threads(NUM_THREADS)
        .build()
        .expect("failed to build rayon thread pool");

    let start = Instant::now();
    pool.scope(|scope| {
        for worker in 0..NUM_THREADS {
            let set = &set;
            scope.spawn(move |_| {
                let mut rng = StdRng::seed_from_u64(worker as u64 + 1);
                for op in generate_ops(&mut rng, OPS_PER_WORKER) {
                    apply(set, op);
                }
            });
        }
    });
    start.elapsed().as_millis()
}

fn apply(set: &CuckooSet<u64>, op: Op) {
    match op {
        Op::Contains(k) => {
            set.contains(&k);
        }
        Op::Add(k) => {
            set.add(k);
        }
        Op::Remove(k) => {
            set.remove(&k);
        }
    }
}

fn main() {
    env_logger::init();

    let serial_ms = run_serial();
    println!("Serial time (milliseconds):\t\t{serial_ms}");

    let concurrent_ms = run_concurrent();
    println!("Concurrent time (milliseconds):\t{concurrent_ms}");
}
