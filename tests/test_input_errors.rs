use map2mesh::base::{FilePath, MapperConfig, MapperError};
use map2mesh::geology::LayerTable;
use map2mesh::mapper::{AttributeDump, Mapper, MeshAdapter};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_inputs(input_dir: &Path) {
    fs::write(input_dir.join("dem.txt"), "10 10\n10 10\n").unwrap();
    fs::write(input_dir.join("layers.dat"), "1, 2.0\n").unwrap();
    fs::write(input_dir.join("wide.txt"), "5 5 5\n5 5 5\n5 5 5\n").unwrap();
    fs::write(input_dir.join("good.txt"), "12 12\n12 12\n").unwrap();
}

fn config_for(input_dir: &Path, out_dir: &str) -> Result<MapperConfig, MapperError> {
    let mut config = MapperConfig::new();
    config
        .set_input_dir(&input_dir.to_string_lossy())?
        .set_dem("dem.txt", " ")?
        .set_layer_table("layers.dat")?
        .set_output_dir(out_dir)?
        .set_verbose(false)?;
    Ok(config)
}

#[test]
fn test_shape_mismatch_stops_before_classification() -> Result<(), MapperError> {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let out_dir = dir.path().join("results").to_string_lossy().to_string();

    let mut config = config_for(dir.path(), &out_dir)?;
    config.add_horizon("wide.txt", " ", '#')?;
    match Mapper::new(config) {
        Err(MapperError::ShapeMismatch { path, expected, actual }) => {
            assert!(path.ends_with("wide.txt"));
            assert_eq!(expected, (2, 2));
            assert_eq!(actual, (3, 3));
        }
        _ => panic!("expected a shape mismatch"),
    }
    assert!(!Path::new(&out_dir).exists());

    // the same error when adding the horizon afterwards; the good horizon remains
    let mut mapper = Mapper::new(config_for(dir.path(), &out_dir)?)?;
    mapper.add_horizon("good.txt", " ", '#')?;
    let err = mapper.add_horizon("wide.txt", " ", '#').err().unwrap();
    assert!(matches!(err, MapperError::ShapeMismatch { .. }));
    assert_eq!(mapper.store().n_horizon(), 1);
    assert_eq!(mapper.config().horizons.len(), 1);
    Ok(())
}

#[test]
fn test_missing_and_malformed_inputs() -> Result<(), MapperError> {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let out_dir = dir.path().join("results").to_string_lossy().to_string();

    let mut config = config_for(dir.path(), &out_dir)?;
    config.add_horizon("missing.txt", " ", '#')?;
    let err = Mapper::new(config).err().unwrap();
    assert!(matches!(err, MapperError::Unreadable { .. }));
    assert!(err.is_load_error());

    fs::write(dir.path().join("bad.txt"), "12 12\n12 twelve\n").unwrap();
    let mut mapper = Mapper::new(config_for(dir.path(), &out_dir)?)?;
    match mapper.add_horizon("bad.txt", " ", '#') {
        Err(MapperError::Malformed { line, .. }) => assert_eq!(line, 2),
        _ => panic!("expected a malformed-file error"),
    }

    fs::write(dir.path().join("empty.dat"), "\n# nothing\n").unwrap();
    let err = LayerTable::read(&dir.path().join("empty.dat"), '#').err().unwrap();
    assert!(matches!(err, MapperError::Empty { .. }));
    Ok(())
}

#[test]
fn test_no_horizons_writes_nothing() -> Result<(), MapperError> {
    let dir = tempdir().unwrap();
    write_inputs(dir.path());
    let out_dir = dir.path().join("results").to_string_lossy().to_string();

    let mapper = Mapper::new(config_for(dir.path(), &out_dir)?)?;
    assert!(matches!(mapper.generate_ids_per_layer(), Err(MapperError::NoHorizons)));
    assert!(!FilePath::layer_ids(&out_dir, 0).exists());

    let mut dump = AttributeDump::new(None);
    assert!(matches!(mapper.map_to_mesh(&mut dump), Err(MapperError::NoHorizons)));
    assert!(!dump.has_mesh());
    Ok(())
}
