use std::env;
use std::error::Error;
use std::time::Instant;

use clap::Parser;
use log::info;

use clue_clustering::clusterer::Clusterer;
use clue_clustering::kernel::Kernel;
use clue_clustering::points::PointStore;
use clue_io::{load_points_csv, write_clusters_csv};

#[derive(Parser, Debug)]
#[clap(name = "clue")]
#[clap(about = "Density-based clustering of N-dimensional weighted point sets (CLUE)", long_about = None)]
struct Args {
    /// input CSV file: header row, then one row per point (D coordinate columns
    /// followed by a weight column)
    #[clap(long, short = 'i')]
    infile: String,
    /// output CSV file: coordinates, weight, is_seed, cluster_id
    #[clap(long, short = 'o')]
    outfile: String,
    /// density radius used by the density pass and the nearest-higher search
    #[clap(long)]
    dc: f64,
    /// minimum density for a point to be a seed
    #[clap(long)]
    rhoc: f64,
    /// maximum nearest-higher search radius, also used as the outlier-delta threshold
    #[clap(long)]
    dm: f64,
    /// minimum delta for a point to become a seed; defaults to --dc
    #[clap(long)]
    seed_dc: Option<f64>,
    /// target number of points per tile
    #[clap(long)]
    ppbin: Option<usize>,
    /// comma-separated list of dimensions to treat as periodic (0-indexed), e.g. "0,2"
    #[clap(long)]
    wrapped: Option<String>,
    /// use the flat kernel with the given height (the default: height 0.5)
    #[clap(long)]
    flat: Option<f64>,
    /// use the exponential kernel with the given "avg,amp" pair
    #[clap(long)]
    exponential: Option<String>,
    /// use the Gaussian kernel with the given "avg,std,amp" triple
    #[clap(long)]
    gaussian: Option<String>,
}

impl Args {
    fn kernel(&self) -> Result<Kernel, Box<dyn Error>> {
        if let Some(h) = self.flat {
            return Ok(Kernel::flat(h)?);
        }
        if let Some(spec) = &self.exponential {
            let parts: Vec<f64> = spec.split(',').map(|s| s.trim().parse()).collect::<Result<_, _>>()?;
            if parts.len() != 2 {
                return Err("--exponential expects \"avg,amp\"".into());
            }
            return Ok(Kernel::exponential(parts[0], parts[1])?);
        }
        if let Some(spec) = &self.gaussian {
            let parts: Vec<f64> = spec.split(',').map(|s| s.trim().parse()).collect::<Result<_, _>>()?;
            if parts.len() != 3 {
                return Err("--gaussian expects \"avg,std,amp\"".into());
            }
            return Ok(Kernel::gaussian(parts[0], parts[1], parts[2])?);
        }
        Ok(Kernel::default())
    }

    fn wrapped_flags(&self, dim: usize) -> Result<Vec<bool>, Box<dyn Error>> {
        let mut flags = vec![false; dim];
        if let Some(spec) = &self.wrapped {
            for part in spec.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                let d: usize = part.parse()?;
                if d >= dim {
                    return Err(format!("--wrapped names dimension {d} but the data has only {dim}").into());
                }
                flags[d] = true;
            }
        }
        Ok(flags)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    unsafe {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();
    let args = Args::parse();

    info!("loading points from {}", args.infile);
    let loaded = load_points_csv(&args.infile)?;
    info!("loaded {} points in {} dimensions", loaded.n, loaded.dim);

    let mut points = PointStore::load(loaded.n, loaded.dim, loaded.coords.clone(), loaded.weights.clone())?;
    let kernel = args.kernel()?;
    let wrapped = args.wrapped_flags(loaded.dim)?;

    let mut clusterer = Clusterer::new(args.dc, args.rhoc, args.dm, args.seed_dc, args.ppbin)?;
    clusterer.set_wrapped_coordinates(&wrapped);

    let start = Instant::now();
    clusterer.make_clusters(&mut points, &kernel)?;
    info!("clustered {} points in {:?}", loaded.n, start.elapsed());

    let groups = clusterer.get_clusters(&points);
    let n_outliers = points.read_clusters().iter().filter(|&&c| c == -1).count();
    info!("found {} clusters, {} outliers", groups.len(), n_outliers);

    write_clusters_csv(
        &args.outfile,
        &loaded.coords,
        &loaded.weights,
        loaded.dim,
        points.read_clusters(),
        points.read_seeds(),
    )?;
    info!("wrote clustering to {}", args.outfile);

    Ok(())
}
