// Path: crates/api/src/state/tests/mod.rs

use super::*;
use meridian_types::app::OutboxRoot;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Included};

#[derive(Default)]
struct MapState(BTreeMap<Vec<u8>, Vec<u8>>);

impl StateAccess for MapState {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        Ok(self.0.get(key).cloned())
    }

    fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), StateError> {
        self.0.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), StateError> {
        self.0.remove(key);
        Ok(())
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        let prefix = prefix.to_vec();
        Ok(Box::new(
            self.0
                .iter()
                .filter(move |(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice())))),
        ))
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<StateScanIter<'_>, StateError> {
        Ok(Box::new(
            self.0
                .range::<[u8], _>((Included(start), Excluded(end)))
                .map(|(k, v)| Ok((Arc::from(k.as_slice()), Arc::from(v.as_slice())))),
        ))
    }
}

fn root(byte: u8) -> OutboxRoot {
    OutboxRoot {
        root: vec![byte; 32],
    }
}

#[test]
fn test_next_prefix() {
    assert_eq!(next_prefix(&[0x01, 0x02]), Some(vec![0x01, 0x03]));
    assert_eq!(next_prefix(&[0x01, 0xff]), Some(vec![0x02]));
    assert_eq!(next_prefix(&[0xff, 0xff]), None);
    assert_eq!(next_prefix(&[]), None);
}

#[test]
fn test_module_store_get_set_del() {
    let store = ModuleStore::<OutboxRoot>::new([1, 2, 3, 4], [0, 0]);
    let mut state = MapState::default();

    let err = store.get(&state, b"abcd").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err, StateError::NotFound("010203040000".to_string() + "61626364"));
    assert!(store.get_opt(&state, b"abcd").unwrap().is_none());

    store.set(&mut state, b"abcd", &root(7)).unwrap();
    assert!(state.0.contains_key(&[1, 2, 3, 4, 0, 0, b'a', b'b', b'c', b'd'][..]));
    assert_eq!(store.get(&state, b"abcd").unwrap(), root(7));
    assert!(store.has(&state, b"abcd").unwrap());

    store.del(&mut state, b"abcd").unwrap();
    assert!(!store.has(&state, b"abcd").unwrap());
}

#[test]
fn test_module_store_range_strips_prefix() {
    let store = ModuleStore::<OutboxRoot>::new([9, 9, 9, 9], [0x80, 0]);
    let other = ModuleStore::<OutboxRoot>::new([9, 9, 9, 9], [0xa0, 0]);
    let mut state = MapState::default();
    for height in [5u32, 10, 20] {
        store
            .set(&mut state, &height.to_be_bytes(), &root(height as u8))
            .unwrap();
    }
    other.set(&mut state, &7u32.to_be_bytes(), &root(0)).unwrap();

    let entries = store
        .range(&state, &0u32.to_be_bytes(), &16u32.to_be_bytes())
        .unwrap();
    let keys: Vec<_> = entries.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec![5u32.to_be_bytes().to_vec(), 10u32.to_be_bytes().to_vec()]);

    assert_eq!(store.all(&state).unwrap().len(), 3);
}

#[test]
fn test_corrupt_value_is_a_decode_error() {
    let store = ModuleStore::<OutboxRoot>::new([0; 4], [0, 0]);
    let mut state = MapState::default();
    state.insert(&store.key(b"x"), &[0x0a]).unwrap();
    assert!(matches!(
        store.get(&state, b"x"),
        Err(StateError::Decode(_))
    ));
}
