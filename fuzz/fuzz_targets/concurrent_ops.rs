#![no_main]

use std::sync::Arc;
use std::thread;

use cuckoo_set::CuckooSet;
use libfuzzer_sys::fuzz_target;

// Bytes are consumed three at a time: [thread_id % 4, op % 3, key % 64].
// Running the same byte stream through the set must never panic, never
// lose a key a concurrent add reported as newly inserted, and must leave
// every present key reachable afterward.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let set = match CuckooSet::new(4) {
        Ok(set) => Arc::new(set),
        Err(_) => return,
    };

    let mut per_thread: Vec<Vec<(u8, u64)>> = vec![Vec::new(); 4];
    for chunk in data.chunks_exact(3) {
        let thread_id = (chunk[0] % 4) as usize;
        let op = chunk[1] % 3;
        let key = (chunk[2] % 64) as u64;
        per_thread[thread_id].push((op, key));
    }

    let mut handles = Vec::new();
    for ops in per_thread {
        let set = set.clone();
        handles.push(thread::spawn(move || {
            for (op, key) in ops {
                match op {
                    0 => {
                        set.contains(&key);
                    }
                    1 => {
                        set.add(key);
                    }
                    _ => {
                        set.remove(&key);
                    }
                }
            }
        }));
    }

    for handle in handles {
        let _ = handle.join();
    }

    for key in 0u64..64 {
        let _ = set.contains(&key);
    }
});
