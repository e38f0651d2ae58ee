use arbitrary::{unstructured::Unstructured, Arbitrary};
use log::{error, info};
use rand::{prelude::random, rngs::SmallRng, Rng, SeedableRng};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use std::{ops::ControlFlow, time};

use rbset::{RbTree, Relation};

/// Command line options.
#[derive(Clone, StructOpt)]
pub struct Opt {
    #[structopt(long = "seed")]
    seed: Option<u64>,

    #[structopt(long = "loads", default_value = "1000000")] // default 1M
    loads: usize,

    #[structopt(long = "inserts", default_value = "0")]
    inserts: usize,

    #[structopt(long = "removes", default_value = "0")]
    removes: usize,

    #[structopt(long = "gets", default_value = "0")]
    gets: usize,

    #[structopt(long = "ranges", default_value = "0")]
    ranges: usize,

    /// One of <, <=, ==, >=, >, picked at random when missing.
    #[structopt(long = "relation")]
    relation: Option<String>,

    #[structopt(long = "limit", default_value = "100")]
    limit: usize,

    #[structopt(long = "validate")]
    validate: bool,

    #[structopt(long = "verbose")]
    verbose: bool,
}

fn main() {
    let opts = Opt::from_args();

    let level = match opts.verbose {
        true => LevelFilter::Debug,
        false => LevelFilter::Info,
    };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto).ok();

    let relation = match opts.relation.as_ref().map(|s| s.parse::<Relation>()) {
        Some(Ok(relation)) => Some(relation),
        Some(Err(err)) => {
            error!("{}", err);
            std::process::exit(1);
        }
        None => None,
    };

    let seed = opts.seed.unwrap_or_else(random);
    info!("seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbTree<u64> = RbTree::new();

    // initial load
    let start = time::Instant::now();
    for _i in 0..opts.loads {
        index.insert(rng.gen());
    }
    info!(
        "loaded {} items in {:?}, height {}",
        opts.loads,
        start.elapsed(),
        index.height()
    );

    do_incremental(&mut rng, &opts, relation, &mut index);

    let start = time::Instant::now();
    let mut n = 0;
    index.enumerate(|_| {
        n += 1;
        ControlFlow::Continue(())
    });
    info!("iterating {} items, took {:?}", n, start.elapsed());

    if opts.validate {
        let start = time::Instant::now();
        match index.validate() {
            Ok(()) => info!("validated {} items in {:?}", index.len(), start.elapsed()),
            Err(err) => {
                error!("{}", err);
                std::process::exit(1);
            }
        }
    }
}

fn do_incremental(
    rng: &mut SmallRng,
    opts: &Opt,
    relation: Option<Relation>,
    index: &mut RbTree<u64>,
) {
    let start = time::Instant::now();
    let total = opts.inserts + opts.removes + opts.gets + opts.ranges;
    let (mut n, mut found, mut scanned) = (total, 0, 0);
    while n > 0 {
        let op = rng.gen::<usize>() % total;

        let key = rng.gen::<u64>();
        if op < opts.inserts {
            index.insert(key);
        } else if op < (opts.inserts + opts.removes) {
            found += index.remove(&key).map(|_| 1).unwrap_or(0);
        } else if op < (opts.inserts + opts.removes + opts.gets) {
            found += index.member(&key).map(|_| 1).unwrap_or(0);
        } else {
            let relation = relation.unwrap_or_else(|| random_relation(rng));
            scanned += index.range(relation, &key).take(opts.limit).count();
        }
        n -= 1;
    }
    info!(
        "incremental for operations {}, found {} scanned {}, took {:?}",
        total,
        found,
        scanned,
        start.elapsed()
    );
}

fn random_relation(rng: &mut SmallRng) -> Relation {
    let bytes = rng.gen::<[u8; 4]>();
    let mut uns = Unstructured::new(&bytes);
    match uns.arbitrary::<Rel>() {
        Ok(rel) => rel.into(),
        Err(_) => Relation::Ge,
    }
}

#[derive(Clone, Debug, Arbitrary, Eq, PartialEq)]
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
