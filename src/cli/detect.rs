//! `scanr detect`: report whether a path identifies as ScanR data.

use std::path::PathBuf;

use anyhow::Result;

use scanr::detect::{file_grouping, is_single_file, is_this_type, matches_name};

pub fn run(path: PathBuf, name_only: bool) -> Result<()> {
    let open = !name_only;
    let identified = is_this_type(&path, open);

    println!("{}: {}", path.display(), verdict(identified));
    if !identified {
        // non-zero exit so shell pipelines can branch on it
        anyhow::bail!("not recognized as a ScanR dataset file");
    }

    if matches_name(&path) {
        println!("  matched by marker name");
    } else {
        println!("  matched by TIFF content");
    }
    println!(
        "  single-file resolvable: {}",
        if is_single_file(&path) { "yes" } else { "no" }
    );
    println!("  grouping: {:?}", file_grouping());
    Ok(())
}

fn verdict(identified: bool) -> &'static str {
    if identified {
        "ScanR dataset file"
    } else {
        "not a ScanR dataset file"
    }
}
