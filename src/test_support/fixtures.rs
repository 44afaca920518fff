//! Test fixtures for common test scenarios.
//!
//! Lock files and dependency manifests shaped like the ones the package
//! manager and the SDK write, trimmed to what the tests need.

use std::path::Path;

/// A project targeting `netcoreapp3.1` and `net461` with disjoint
/// dependency sets.
///
/// - netcoreapp3.1: `Newtonsoft.Json` 12.0.3 and the project reference `Lib`
/// - net461: `System.ValueTuple` 4.5.0, which depends on `System.Buffers`
pub const TWO_FRAMEWORK_ASSETS: &str = r#"{
  "version": 3,
  "targets": {
    ".NETCoreApp,Version=v3.1": {
      "Newtonsoft.Json/12.0.3": {
        "type": "package",
        "compile": {
          "lib/netstandard2.0/Newtonsoft.Json.dll": {}
        },
        "runtime": {
          "lib/netstandard2.0/Newtonsoft.Json.dll": {}
        }
      },
      "Lib/1.0.0": {
        "type": "project",
        "framework": ".NETCoreApp,Version=v3.1",
        "dependencies": {
          "Newtonsoft.Json": "12.0.3"
        },
        "compile": {
          "bin/placeholder/Lib.dll": {}
        },
        "runtime": {
          "bin/placeholder/Lib.dll": {}
        }
      }
    },
    ".NETFramework,Version=v4.6.1": {
      "System.Buffers/4.5.1": {
        "type": "package",
        "frameworkAssemblies": [
          "System"
        ],
        "compile": {
          "ref/net45/_._": {}
        },
        "runtime": {
          "lib/net461/System.Buffers.dll": {}
        }
      },
      "System.ValueTuple/4.5.0": {
        "type": "package",
        "dependencies": {
          "System.Buffers": "4.5.1"
        },
        "compile": {
          "ref/net461/System.ValueTuple.dll": {}
        },
        "runtime": {
          "lib/net461/System.ValueTuple.dll": {}
        }
      }
    }
  },
  "libraries": {
    "Newtonsoft.Json/12.0.3": {
      "sha512": "6mgjfnRB4jKMlzHSl+VD+oUc1IebOZabkbyWj2RiTgWwYPPuaK1H97G1sHqGwPlS5npiF5Q0OrxN1wni2n5QWg==",
      "type": "package",
      "path": "newtonsoft.json/12.0.3",
      "files": [
        ".signature.p7s",
        "lib/netstandard2.0/Newtonsoft.Json.dll",
        "newtonsoft.json.12.0.3.nupkg.sha512",
        "newtonsoft.json.nuspec"
      ]
    },
    "Lib/1.0.0": {
      "type": "project",
      "path": "../Lib/Lib.csproj",
      "msbuildProject": "../Lib/Lib.csproj"
    },
    "System.Buffers/4.5.1": {
      "sha512": "Rw7ijyl1qqRS0YQD/WycNst8hUUMgrMH4FCn1nNm27M4VxchZ1js3fVjQaANHO5f3sN4isvP4a+Met9Y4YomAg==",
      "type": "package",
      "path": "system.buffers/4.5.1",
      "files": [
        "lib/net461/System.Buffers.dll",
        "ref/net45/_._"
      ]
    },
    "System.ValueTuple/4.5.0": {
      "sha512": "okurQJO6NRE/apDIP23ajJ0hpiNmJ+f0BwOlB/cSqTLQlw5upkf+5+96+iG2Jw40G1fCVCyPz/FhIABUjMR+RQ==",
      "type": "package",
      "serviceable": true,
      "path": "system.valuetuple/4.5.0",
      "files": [
        "lib/net461/System.ValueTuple.dll",
        "ref/net461/System.ValueTuple.dll"
      ]
    }
  },
  "projectFileDependencyGroups": {
    ".NETCoreApp,Version=v3.1": [
      "Lib >= 1.0.0",
      "Newtonsoft.Json >= 12.0.3"
    ],
    ".NETFramework,Version=v4.6.1": [
      "System.ValueTuple >= 4.5.0"
    ]
  },
  "packageFolders": {
    "/home/dev/.nuget/packages/": {}
  },
  "project": {
    "version": "1.0.0",
    "restore": {
      "projectUniqueName": "/src/App/App.csproj",
      "projectName": "App",
      "projectPath": "/src/App/App.csproj",
      "packagesPath": "/home/dev/.nuget/packages/",
      "outputPath": "/src/App/obj/",
      "projectStyle": "PackageReference",
      "configFilePaths": [
        "/home/dev/.nuget/NuGet/NuGet.Config"
      ],
      "originalTargetFrameworks": [
        "net461",
        "netcoreapp3.1"
      ],
      "sources": {
        "https://api.nuget.org/v3/index.json": {}
      },
      "frameworks": {
        "netcoreapp3.1": {
          "projectReferences": {
            "/src/Lib/Lib.csproj": {
              "projectPath": "/src/Lib/Lib.csproj"
            }
          }
        },
        "net461": {
          "projectReferences": {}
        }
      }
    },
    "frameworks": {
      "netcoreapp3.1": {
        "dependencies": {
          "Newtonsoft.Json": {"target": "Package", "version": "[12.0.3, )"}
        },
        "imports": [
          "net461",
          "net462",
          "net47",
          "net471",
          "net472",
          "net48"
        ],
        "assetTargetFallback": true,
        "warn": true,
        "frameworkReferences": {
          "Microsoft.NETCore.App": {
            "privateAssets": "all"
          }
        },
        "runtimeIdentifierGraphPath": "/usr/share/dotnet/sdk/3.1.426/RuntimeIdentifierGraph.json"
      },
      "net461": {
        "dependencies": {
          "System.ValueTuple": {"target": "Package", "version": "[4.5.0, )"}
        }
      }
    }
  },
  "logs": [
    {
      "code": "NU1701",
      "level": "Warning",
      "message": "Package 'System.ValueTuple 4.5.0' was restored using '.NETFramework,Version=v4.6.1' instead of the project target framework.",
      "libraryId": "System.ValueTuple",
      "targetGraphs": [
        ".NETFramework,Version=v4.6.1"
      ]
    }
  ]
}"#;

/// A project whose `netcoreapp3.1` target section is empty while its first
/// import, `net461`, has assets.
pub const FALLBACK_ASSETS: &str = r#"{
  "version": 3,
  "targets": {
    ".NETCoreApp,Version=v3.1": {},
    ".NETFramework,Version=v4.6.1": {
      "Old.Library/1.0.0": {
        "type": "package",
        "compile": {
          "lib/net45/Old.Library.dll": {}
        }
      }
    }
  },
  "libraries": {
    "Old.Library/1.0.0": {
      "type": "package",
      "path": "old.library/1.0.0"
    }
  },
  "projectFileDependencyGroups": {
    ".NETCoreApp,Version=v3.1": [
      "Old.Library >= 1.0.0"
    ]
  },
  "project": {
    "restore": {
      "projectUniqueName": "/src/Legacy/Legacy.csproj",
      "projectPath": "/src/Legacy/Legacy.csproj"
    },
    "frameworks": {
      "netcoreapp3.1": {
        "dependencies": {
          "Old.Library": "[1.0.0, )"
        },
        "imports": [
          "net461"
        ],
        "assetTargetFallback": true
      }
    }
  }
}"#;

/// `App.deps.json` for an application whose main binary references
/// `Newtonsoft.Json`, the project `Helpers` and a package `Ghost` that is
/// never deployed.
pub const APP_DEPS_JSON: &str = r#"{
  "runtimeTarget": {
    "name": ".NETCoreApp,Version=v3.1",
    "signature": ""
  },
  "compilationOptions": {},
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
            "assemblyVersion": "12.0.0.0",
            "fileVersion": "12.0.3.23909"
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
      "type": "project",
      "serviceable": false,
      "sha512": ""
    },
    "Newtonsoft.Json/12.0.3": {
      "type": "package",
      "serviceable": true,
      "sha512": "sha512-6mgjfnRB4jKMlzHSl+VD+oUc1IebOZabkbyWj2RiTgWwYPPuaK1H97G1sHqGwPlS5npiF5Q0OrxN1wni2n5QWg==",
      "path": "newtonsoft.json/12.0.3",
      "hashPath": "newtonsoft.json.12.0.3.nupkg.sha512"
    },
    "Helpers/1.0.0": {
      "type": "project",
      "serviceable": false,
      "sha512": ""
    },
    "Ghost/2.0.0": {
      "type": "package",
      "serviceable": true,
      "sha512": "",
      "path": "ghost/2.0.0"
    }
  }
}"#;

/// First line of every image written by [`write_fake_image`].
pub const FAKE_IMAGE_HEADER: &str = "MZ fake image";

/// Write an image that [`FakeImageReader`](super::FakeImageReader) reads as
/// assembly `display_name` referencing `references`.
pub fn write_fake_image(
    path: &Path,
    display_name: &str,
    references: &[&str],
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut text = format!("{}\n{}\n", FAKE_IMAGE_HEADER, display_name);
    for reference in references {
        text.push_str(reference);
        text.push('\n');
    }
    std::fs::write(path, text)
}
