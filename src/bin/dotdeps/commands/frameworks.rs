//! `dotdeps frameworks` command

use anyhow::Result;

use crate::cli::FrameworksArgs;
use dotdeps::ops::{find_assets_file, load_assets};
use dotdeps::util::diagnostic;

pub fn execute(args: FrameworksArgs, color: bool) -> Result<()> {
    let path = find_assets_file(&args.assets)?;
    let doc = load_assets(&path)?;

    for section in doc.project_frameworks() {
        let framework = section.framework();
        let libraries = doc.target(framework).map(|t| t.len()).unwrap_or(0);

        println!(
            "{} ({}) - {} libraries",
            framework.short_folder_name(),
            framework,
            libraries
        );

        if !section.imports().is_empty() {
            let imports: Vec<_> = section
                .imports()
                .iter()
                .map(|tfm| tfm.short_folder_name())
                .collect();
            println!("    imports: {}", imports.join(", "));
        }
    }

    for log in doc.logs() {
        diagnostic::emit(&log.to_diagnostic().with_location(&path), color);
    }

    Ok(())
}
