use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};

use super::*;

type Item = (u8, u8);

// order by key only, the second field tells equal keys apart.
fn by_key(a: &Item, b: &Item) -> Ordering {
    a.0.cmp(&b.0)
}

fn height_bound(n: usize) -> usize {
    (2.0 * ((n + 1) as f64).log2()).floor() as usize
}

#[test]
fn test_rbtree() {
    let seed: u64 = random();
    // let seed: u64 = 2849271693040417317;
    println!("test_rbtree {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index = RbTree::with_comparator(by_key);
    let mut model: Vec<Item> = Vec::default();

    let mut counts = [0_usize; 12];

    for _i in 0..200_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), model.len());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), model.is_empty());
            }
            Op::Insert(key, id) => {
                counts[2] += 1;
                index.insert((key, id));
                model_insert(&mut model, (key, id));
            }
            Op::Remove(key, id) => {
                counts[3] += 1;
                let (a, b) = (index.remove(&(key, id)), model_remove(&mut model, &(key, id)));
                assert_eq!(a, b, "remove {:?}", (key, id));
            }
            Op::RemoveExisting(off) if !model.is_empty() => {
                counts[4] += 1;
                let item = model[off % model.len()];
                assert_eq!(index.remove(&item), Some(item));
                model_remove(&mut model, &item);
            }
            Op::RemoveExisting(_) => {
                counts[4] += 1;
                assert_eq!(index.first(), None);
            }
            Op::Member(key, id) => {
                counts[5] += 1;
                let item = (key, id);
                let b = model.iter().find(|x| **x == item);
                assert_eq!(index.member(&item), b, "member {:?}", item);
                assert_eq!(index.contains(&item), b.is_some());
            }
            Op::FirstLast => {
                counts[6] += 1;
                assert_eq!(index.first(), model.first());
                assert_eq!(index.last(), model.last());
            }
            Op::Iter => {
                counts[7] += 1;
                assert_eq!(index.to_vec(), model);
                let a: Vec<Item> = index.reverse().cloned().collect();
                let b: Vec<Item> = model.iter().rev().cloned().collect();
                assert_eq!(a, b);
            }
            Op::Range(rel, key) => {
                counts[8] += 1;
                let (relation, boundary) = (Relation::from(rel), (key, 0));
                let a = index.collect_range(relation, &boundary);
                let b: Vec<Item> = model
                    .iter()
                    .filter(|x| relation.accepts(by_key(x, &boundary)))
                    .cloned()
                    .collect();
                assert_eq!(a, b, "range {} {}", relation, key);
            }
            Op::Validate => {
                counts[9] += 1;
                index.validate().unwrap();
                assert!(index.height() <= height_bound(index.len()));
            }
            Op::Extend(items) => {
                counts[10] += 1;
                index.extend(items.clone());
                items.into_iter().for_each(|x| model_insert(&mut model, x));
            }
            Op::Clear if model.len() > 1000 => {
                counts[11] += 1;
                index.clear();
                model.clear();
            }
            Op::Clear => (),
        }
    }

    index.validate().unwrap();
    assert_eq!(index.to_vec(), model);

    println!("counts {:?} len:{}/{}", counts, index.len(), model.len());
}

#[test]
fn test_insert_scenario() {
    let mut tree: RbTree<u32> = RbTree::new();
    for value in [5, 2, 8, 1, 9, 3].iter() {
        tree.insert(*value);
        tree.validate().unwrap();
    }
    assert_eq!(tree.len(), 6);
    assert_eq!(tree.to_vec(), vec![1, 2, 3, 5, 8, 9]);

    assert_eq!(tree.remove(&5), Some(5));
    assert_eq!(tree.contains(&5), false);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.to_vec(), vec![1, 2, 3, 8, 9]);
    tree.validate().unwrap();

    assert_eq!(tree.remove(&5), None);
    assert_eq!(tree.len(), 5);
}

#[test]
fn test_equal_values() {
    let mut tree = RbTree::with_comparator(by_key);
    tree.insert((10, 1));
    tree.insert((10, 2));
    tree.insert((10, 3));
    tree.validate().unwrap();
    assert_eq!(tree.len(), 3);

    let mut seen = vec![];
    tree.enumerate_range(Relation::Eq, &(10, 0), |item| {
        seen.push(*item);
        ControlFlow::Continue(())
    });
    assert_eq!(seen, vec![(10, 1), (10, 2), (10, 3)]);

    // lookup goes by identity among equal keys.
    assert_eq!(tree.member(&(10, 2)), Some(&(10, 2)));
    assert_eq!(tree.member(&(10, 4)), None);
    assert_eq!(tree.remove(&(10, 2)), Some((10, 2)));
    assert_eq!(tree.to_vec(), vec![(10, 1), (10, 3)]);
    tree.validate().unwrap();
}

#[test]
fn test_equal_values_rotated() {
    let mut tree = RbTree::with_comparator(by_key);
    for id in 0..100 {
        tree.insert((7, id));
        tree.insert((3, id));
    }
    tree.validate().unwrap();

    let sevens: Vec<u8> = tree.range(Relation::Eq, &(7, 0)).map(|x| x.1).collect();
    assert_eq!(sevens, (0..100).collect::<Vec<u8>>());
    for id in (0..100).rev() {
        assert!(tree.contains(&(7, id)), "missing {}", id);
    }
    for id in (0..100).step_by(3) {
        assert_eq!(tree.remove(&(3, id)), Some((3, id)));
    }
    tree.validate().unwrap();
    assert_eq!(tree.len(), 200 - 34);
}

#[test]
fn test_empty() {
    let tree: RbTree<u64> = RbTree::default();
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.is_empty(), true);
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.member(&10), None);

    let mut n = 0;
    tree.enumerate(|_| {
        n += 1;
        ControlFlow::Continue(())
    });
    assert_eq!(n, 0);
    assert_eq!(tree.iter().next(), None);
    assert_eq!(tree.reverse().next(), None);
    assert_eq!(tree.collect_range(Relation::Ge, &0), Vec::<u64>::new());
    tree.validate().unwrap();
}

#[test]
fn test_ascending_height() {
    let mut tree: RbTree<u32> = RbTree::new();
    for value in 1..=1000 {
        tree.insert(value);
    }
    tree.validate().unwrap();
    assert_eq!(tree.len(), 1000);
    assert!(tree.height() <= 19, "height {}", tree.height());

    for value in (1..=1000).step_by(2) {
        assert_eq!(tree.remove(&value), Some(value));
    }
    tree.validate().unwrap();
    assert!(tree.height() <= height_bound(500), "height {}", tree.height());
    assert_eq!(tree.first(), Some(&2));
    assert_eq!(tree.last(), Some(&1000));
}

#[test]
fn test_remove_all() {
    let seed: u64 = random();
    println!("test_remove_all {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut values: Vec<u32> = (0..2000).map(|_| rng.gen::<u32>() % 500).collect();
    let mut tree: RbTree<u32> = values.iter().cloned().collect();
    assert_eq!(tree.len(), values.len());

    while !values.is_empty() {
        let value = values.swap_remove(rng.gen::<usize>() % values.len());
        assert_eq!(tree.remove(&value), Some(value));
        assert_eq!(tree.len(), values.len());
        if values.len() % 97 == 0 {
            tree.validate().unwrap();
        }
    }
    assert_eq!(tree.is_empty(), true);
    assert_eq!(tree.root, None);
    assert_eq!(tree.nodes.len(), 0);
}

#[test]
fn test_comparator() {
    let mut tree = RbTree::with_comparator(|a: &String, b: &String| b.cmp(a));
    tree.extend(vec!["b".to_string(), "c".to_string(), "a".to_string()]);
    tree.validate().unwrap();
    assert_eq!(tree.to_vec(), vec!["c", "b", "a"]);
    assert_eq!(tree.first().map(|s| s.as_str()), Some("c"));
    assert_eq!(tree.collect_range(Relation::Lt, &"b".to_string()), vec!["c"]);
}

#[test]
fn test_clear() {
    let mut tree: RbTree<u32> = (0..100).collect();
    assert_eq!(tree.len(), 100);
    tree.clear();
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.first(), None);
    tree.validate().unwrap();

    tree.insert(42);
    assert_eq!(tree.to_vec(), vec![42]);
    tree.validate().unwrap();
}

#[test]
fn test_objects_passing() {
    let tree: RbTree<u32> = (0..20).rev().collect();
    assert_eq!(tree.objects_passing(|x| x % 5 == 0), vec![0, 5, 10, 15]);
    assert_eq!(tree.objects_passing(|_| false), Vec::<u32>::new());

    let mut seen = vec![];
    tree.enumerate(|x| {
        seen.push(*x);
        match *x {
            3 => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    });
    assert_eq!(seen, vec![0, 1, 2, 3]);

    let items: Vec<u32> = (&tree).into_iter().take(3).cloned().collect();
    assert_eq!(items, vec![0, 1, 2]);
}

#[test]
fn test_validate_failures() {
    let mut tree: RbTree<u32> = (0..10).collect();
    tree.validate().unwrap();

    let root = tree.root.unwrap();
    tree.nodes[root].set_red();
    assert!(tree.validate().is_err());
    tree.nodes[root].set_black();
    tree.validate().unwrap();

    let left = tree.nodes[root].left.unwrap();
    let value = tree.nodes[left].value;
    tree.nodes[left].value = 100;
    let err = tree.validate().unwrap_err();
    assert!(format!("{}", err).contains("Fatal"), "{}", err);
    tree.nodes[left].value = value;
    tree.validate().unwrap();

    tree.n_count += 1;
    assert!(tree.validate().is_err());
}

#[test]
fn test_pretty_print() {
    let mut tree: RbTree<u32> = RbTree::new();
    tree.insert(2);
    tree.insert(1);
    tree.insert(3);
    assert_eq!(tree.to_pretty_string(), "(b)<2>\n  (r)<1>\n  (r)<3>\n");
    assert_eq!(format!("{:?}", tree), "{1, 2, 3}");

    tree.insert(4);
    let out = tree.to_pretty_string();
    assert!(out.contains("    (r)<4>\n"), "{}", out);
    assert!(out.contains("    (b)<nil>\n"), "{}", out);
}

#[derive(Debug, Arbitrary)]
enum Op {
    Len,
    IsEmpty,
    Insert(u8, u8),
    Remove(u8, u8),
    RemoveExisting(usize),
    Member(u8, u8),
    FirstLast,
    Iter,
    Range(Rel, u8),
    Validate,
    Extend(Vec<Item>),
    Clear,
}

#[derive(Debug, Arbitrary, Clone, Copy)]
enum Rel {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl From<Rel> for Relation {
    fn from(rel: Rel) -> Self {
        match rel {
            Rel::Lt => Relation::Lt,
            Rel::Le => Relation::Le,
            Rel::Eq => Relation::Eq,
            Rel::Ge => Relation::Ge,
            Rel::Gt => Relation::Gt,
        }
    }
}

// equal keys go after existing ones.
fn model_insert(model: &mut Vec<Item>, item: Item) {
    let off = model.iter().take_while(|x| x.0 <= item.0).count();
    model.insert(off, item);
}

fn model_remove(model: &mut Vec<Item>, item: &Item) -> Option<Item> {
    let off = model.iter().position(|x| x == item)?;
    Some(model.remove(off))
}
