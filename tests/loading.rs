//! End-to-end loading tests against binaries on disk.
//!
//! Images here are small text files read by [`TextImageReader`], so the
//! tests can state each binary's identity and references directly.

use std::fs;
use std::path::{Path, PathBuf};

use dotdeps::loader::{
    AssemblyName, CompilationReferenceSet, ImageMetadata, ImageReader, LoadError, LoadStatus,
    LoaderContext, ProbingLoaderContext,
};
use dotdeps::ops::{probing_context, resolve_compilation, CompilationRequest};
use dotdeps::util::config::LoaderConfig;
use dotdeps::{ProjectAssetsDocument, TargetFrameworkMoniker};
use tempfile::TempDir;

const APP_DEPS_JSON: &str = r#"{
  "runtimeTarget": {
    "name": ".NETCoreApp,Version=v3.1"
  },
  "targets": {
    ".NETCoreApp,Version=v3.1": {
      "App/1.0.0": {
        "dependencies": {
          "Newtonsoft.Json": "12.0.3",
          "Helpers": "1.0.0",
          "Ghost": "2.0.0"
        },
        "runtime": {
          "App.dll": {}
        }
      },
      "Newtonsoft.Json/12.0.3": {
        "runtime": {
          "lib/netstandard2.0/Newtonsoft.Json.dll": {
            "assemblyVersion": "12.0.0.0"
          }
        }
      },
      "Helpers/1.0.0": {
        "runtime": {
          "Helpers.dll": {}
        }
      },
      "Ghost/2.0.0": {
        "runtime": {
          "lib/netstandard2.0/Ghost.dll": {}
        }
      }
    }
  },
  "libraries": {
    "App/1.0.0": {
      "type": "project"
    },
    "Newtonsoft.Json/12.0.3": {
      "type": "package",
      "path": "newtonsoft.json/12.0.3"
    },
    "Helpers/1.0.0": {
      "type": "project"
    },
    "Ghost/2.0.0": {
      "type": "package",
      "path": "ghost/2.0.0"
    }
  }
}"#;

const ASSETS: &str = r#"{
  "version": 3,
  "targets": {
    ".NETCoreApp,Version=v3.1": {
      "Newtonsoft.Json/12.0.3": {
        "type": "package",
        "compile": {
          "lib/netstandard2.0/Newtonsoft.Json.dll": {}
        }
      }
    }
  },
  "libraries": {
    "Newtonsoft.Json/12.0.3": {
      "type": "package",
      "path": "newtonsoft.json/12.0.3"
    }
  },
  "projectFileDependencyGroups": {
    ".NETCoreApp,Version=v3.1": [
      "Newtonsoft.Json >= 12.0.3"
    ]
  },
  "packageFolders": {
    "{PACKAGES}": {}
  },
  "project": {
    "restore": {
      "projectUniqueName": "/src/App/App.csproj",
      "projectPath": "/src/App/App.csproj"
    },
    "frameworks": {
      "netcoreapp3.1": {
        "dependencies": {
          "Newtonsoft.Json": "[12.0.3, )"
        }
      }
    }
  }
}"#;

/// Image format: the assembly's display name on the first line, then one
/// referenced display name per line.
#[derive(Debug, Default)]
struct TextImageReader;

impl ImageReader for TextImageReader {
    fn read(&self, path: &Path) -> Result<ImageMetadata, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut names = text.lines().map(|line| {
            AssemblyName::parse(line).map_err(|e| LoadError::BadImage {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        });
        let name = names.next().ok_or_else(|| LoadError::BadImage {
            path: path.to_path_buf(),
            reason: "empty image".to_string(),
        })??;
        Ok(ImageMetadata::new(name, names.collect::<Result<_, _>>()?))
    }
}

fn write_image(path: &Path, name: &str, references: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut text = vec![name];
    text.extend_from_slice(references);
    fs::write(path, text.join("\n")).unwrap();
}

/// An application directory with `App.dll`, its manifest and `Helpers.dll`,
/// plus a package folder holding `Newtonsoft.Json`. `App` references all
/// three and `Ghost`, which is never deployed.
struct Deployment {
    _tmp: TempDir,
    main: PathBuf,
    packages: PathBuf,
}

fn deploy() -> Deployment {
    let tmp = TempDir::new().unwrap();
    let bin = tmp.path().join("bin");
    let packages = tmp.path().join("packages");

    let main = bin.join("App.dll");
    write_image(
        &main,
        "App, Version=1.0.0.0",
        &[
            "Newtonsoft.Json, Version=12.0.0.0",
            "Helpers, Version=1.0.0.0",
            "Ghost, Version=2.0.0.0",
        ],
    );
    write_image(&bin.join("Helpers.dll"), "Helpers, Version=1.0.0.0", &[]);
    fs::write(bin.join("App.deps.json"), APP_DEPS_JSON).unwrap();
    write_image(
        &packages
            .join("newtonsoft.json/12.0.3")
            .join("lib/netstandard2.0/Newtonsoft.Json.dll"),
        "Newtonsoft.Json, Version=12.0.0.0, PublicKeyToken=30ad4fe6b2a6aeed",
        &[],
    );

    Deployment {
        _tmp: tmp,
        main,
        packages,
    }
}

#[test]
fn test_declared_references_are_loaded_when_resolvable() {
    let deployment = deploy();
    let context = ProbingLoaderContext::with_reader(TextImageReader)
        .with_package_folder(&deployment.packages)
        .with_main_binary(&deployment.main)
        .unwrap();

    let mut set = CompilationReferenceSet::new(context);
    set.add_path(&deployment.main);
    let summary = set.resolve();

    assert_eq!(summary.explicit, 1);
    assert_eq!(summary.discovered, 3);
    assert_eq!(summary.failed, 1);

    let names: Vec<_> = set
        .resolved_binaries()
        .iter()
        .map(|b| b.name().name().to_string())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().any(|n| n == "App"));
    assert!(names.iter().any(|n| n == "Newtonsoft.Json"));
    assert!(names.iter().any(|n| n == "Helpers"));
    assert!(!names.iter().any(|n| n == "Ghost"));

    let results = set.load_results(&["App"]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status, LoadStatus::Loaded);
}

#[test]
fn test_name_loads_take_identity_from_the_image() {
    let deployment = deploy();
    let mut context = ProbingLoaderContext::with_reader(TextImageReader)
        .with_package_folder(&deployment.packages)
        .with_main_binary(&deployment.main)
        .unwrap();

    let json = context
        .load_from_name(&AssemblyName::new("newtonsoft.json"))
        .unwrap();
    assert!(json.location().ends_with("Newtonsoft.Json.dll"));
    assert_eq!(json.name().name(), "Newtonsoft.Json");
    assert_eq!(json.name().public_key_token(), Some("30ad4fe6b2a6aeed"));
    assert_eq!(
        json.name().version().map(ToString::to_string),
        Some("12.0.0.0".to_string())
    );

    assert!(context
        .load_from_name(&AssemblyName::new("Ghost"))
        .is_err());
}

#[test]
fn test_compilation_of_lock_file_loads_package_and_extra_path() {
    let deployment = deploy();
    let folder = format!("{}/", deployment.packages.display());
    let doc = ProjectAssetsDocument::from_json_str(&ASSETS.replace("{PACKAGES}", &folder))
        .unwrap();

    let config = LoaderConfig {
        main_binary: Some(deployment.main.clone()),
        ..LoaderConfig::default()
    };
    let context = probing_context(&doc, &config, TextImageReader).unwrap();

    let framework = TargetFrameworkMoniker::parse_any("netcoreapp3.1").unwrap();
    let mut request = CompilationRequest::new(framework);
    request.paths.push(deployment.main.clone());

    let outcome = resolve_compilation(&doc, &request, context).unwrap();

    assert!(!outcome.used_fallback);
    assert_eq!(outcome.libraries.len(), 1);
    assert!(outcome
        .results
        .iter()
        .all(|r| r.status == LoadStatus::Loaded));
    assert!(outcome
        .binaries
        .iter()
        .any(|b| b.name().name() == "Helpers"));
    assert!(!outcome.binaries.iter().any(|b| b.name().name() == "Ghost"));
}
