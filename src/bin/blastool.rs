//! Demonstration CLI: load a mesh, build a BLAS, wrap it in a one-instance
//! TLAS, and write the result to a file. Exercises the whole pipeline but
//! is not part of the crate's tested core contract.

use std::env;
use std::process;
use std::rc::Rc;

use blasforge::config::BuildConfig;
use blasforge::demo_loader::load_obj_mesh;
use blasforge::geometry::Matrix4f;
use blasforge::instance::Instance;
use blasforge::progress::LoggingProgress;
use blasforge::serialize::write_tlas;
use blasforge::tlas::build_tlas;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: blastool <input.obj> <output.tlas>");
        process::exit(2);
    }

    if let Err(e) = run(&args[1], &args[2]) {
        eprintln!("blastool: {}", e);
        process::exit(1);
    }
}

fn run(input: &str, output: &str) -> blasforge::error::Result<()> {
    let config = BuildConfig::default();
    let progress = LoggingProgress;

    let mesh = load_obj_mesh(input)?;
    log::info!("loaded mesh: {} vertices, {} faces", mesh.vcount(), mesh.fcount());

    let blas = Rc::new(blasforge::blas::build_blas(&mesh, &config, &progress)?);
    log::info!("built BLAS: {} bytes", blas.len());

    let instance = Instance::new(Matrix4f::from_translation(cgmath::Vector3::new(0.0, 0.0, 0.0)), 0, 0, blas);
    let tlas = build_tlas(&[instance], &config, &progress)?;
    log::info!("built TLAS: {} bytes", tlas.len());

    write_tlas(&tlas, output)?;
    log::info!("wrote {}", output);
    Ok(())
}
