use static_files::resource_dir;

fn main() -> std::io::Result<()> {
    built::write_built_file()?;

    println!("cargo::rerun-if-changed=../vidshelf-site/dist");
    resource_dir("../vidshelf-site/dist").build()
}
