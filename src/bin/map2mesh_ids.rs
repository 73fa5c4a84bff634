use map2mesh::base::{FilePath, MapperConfig, MapperError, MARK_NA};
use map2mesh::mapper::{AttributeDump, Mapper};
use map2mesh::util::plot_profile;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "map2mesh_ids",
    about = "Maps geological horizons onto the layers of a DEM-based mesh and writes one id raster per layer"
)]
struct Options {
    /// JSON configuration file
    config: String,

    /// Also writes the JSON summary of the layered mesh
    #[structopt(long)]
    mesh_summary: bool,

    /// Draws the cross-section at this grid row (SVG in the output directory)
    #[structopt(long)]
    plot_row: Option<usize>,
}

fn main() {
    env_logger::init();
    let options = Options::from_args();
    if let Err(e) = run(&options) {
        println!("{} {}", MARK_NA, e);
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), MapperError> {
    // load data
    let config = MapperConfig::read_json(&options.config)?;
    let out_dir = config.output_dir.clone();
    let mapper = Mapper::new(config)?;

    // classify and write
    let layers = if options.mesh_summary {
        let path = FilePath::mesh_summary(&out_dir, "_mesh");
        let mut dump = AttributeDump::new(Some(path.clone()));
        let layers = mapper.map_to_mesh(&mut dump)?;
        println!("mesh summary: {}", path.display());
        layers
    } else {
        mapper.generate_ids_per_layer()?
    };

    // cross-section
    if let Some(row) = options.plot_row {
        let path = FilePath::svg(&out_dir, &format!("profile-row-{}", row));
        plot_profile(mapper.store(), &layers, row, &path)?;
        println!("profile: {}", path.display());
    }

    // message
    let thin_line = format!("{:─^1$}", "", out_dir.len());
    println!("\n{}", thin_line);
    println!("{} id rasters written to", layers.len());
    println!("{}", out_dir);
    println!("{}\n", thin_line);
    Ok(())
}
