//! Memory reclamation over the data/process graph.
//!
//! Starting from the data objects an application publishes, walk upstream
//! through producers and collect every intermediate buffer. Seeds are never
//! collected. Released content stays regenerable because each data object
//! keeps its producer.

use std::collections::HashSet;

use super::data::{DataHandle, DataId, DataKind};

/// Data objects strictly upstream of `seeds`, in discovery order. List
/// containers are expanded element-wise and not returned themselves.
pub fn collect_upstream(seeds: &[DataHandle]) -> Vec<DataHandle> {
    let mut visited_data: HashSet<DataId> = seeds.iter().map(|d| d.id()).collect();
    let mut visited_process: HashSet<u64> = HashSet::new();
    let mut to_release = Vec::new();
    let mut stack: Vec<DataHandle> = seeds.to_vec();

    while let Some(data) = stack.pop() {
        let Some(producer) = data.producer() else {
            continue;
        };
        if !visited_process.insert(producer.id()) {
            continue;
        }
        for input in producer.inputs() {
            let expanded = if input.kind() == DataKind::List {
                input.items()
            } else {
                vec![input.clone()]
            };
            for item in expanded {
                if visited_data.insert(item.id()) {
                    to_release.push(item.clone());
                    stack.push(item);
                }
            }
        }
    }
    to_release
}

/// Release every object upstream of `seeds` except those in `keep`.
/// Objects without a producer cannot regenerate their content and are left
/// alone. Returns how many objects actually dropped content.
pub fn release_upstream(seeds: &[DataHandle], keep: &HashSet<DataId>) -> usize {
    let mut released = 0;
    for data in collect_upstream(seeds) {
        if keep.contains(&data.id()) || data.producer().is_none() {
            continue;
        }
        if data.release_data() {
            released += 1;
        }
    }
    released
}
