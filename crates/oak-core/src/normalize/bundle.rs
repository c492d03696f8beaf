//! Merges the targets of external `$ref`s into the root document's `components`.
//!
//! Each distinct (file, pointer) target is copied once and every reference to it is
//! rewritten to the local `#/components/<section>/<name>` it was assigned. References
//! inside copied targets are resolved relative to the file they came from.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::loader::DocumentLoader;
use crate::error::NormalizeError;

/// Component section a bundled target is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    Schemas,
    Parameters,
    Responses,
    RequestBodies,
    Examples,
    Headers,
}

impl Section {
    const ALL: [Section; 6] = [
        Section::Schemas,
        Section::Parameters,
        Section::Responses,
        Section::RequestBodies,
        Section::Examples,
        Section::Headers,
    ];

    fn key(&self) -> &'static str {
        match self {
            Section::Schemas => "schemas",
            Section::Parameters => "parameters",
            Section::Responses => "responses",
            Section::RequestBodies => "requestBodies",
            Section::Examples => "examples",
            Section::Headers => "headers",
        }
    }

    fn from_key(key: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.key() == key)
    }
}

/// How the children of a JSON node are classified.
#[derive(Debug, Clone, Copy)]
enum Children {
    /// Children are named by their keys (`parameters`, `responses`, ...).
    ByKey,
    /// Children are named entries of one section (`components/schemas`, `properties`).
    Named(Section),
}

/// Where a node sits: the section a `$ref` found here belongs to, and how its
/// children are classified.
#[derive(Debug, Clone, Copy)]
struct Slot {
    section: Section,
    children: Children,
}

impl Slot {
    const ROOT: Slot = Slot {
        section: Section::Schemas,
        children: Children::ByKey,
    };

    fn for_key(key: &str) -> Slot {
        let (section, children) = match key {
            "requestBody" => (Section::RequestBodies, Children::ByKey),
            "properties" | "patternProperties" | "$defs" | "definitions" => {
                (Section::Schemas, Children::Named(Section::Schemas))
            }
            other => match Section::from_key(other) {
                Some(named) => (Section::Schemas, Children::Named(named)),
                None => (Section::Schemas, Children::ByKey),
            },
        };
        Slot { section, children }
    }

    fn child(&self, key: Option<&str>) -> Slot {
        match (self.children, key) {
            (Children::Named(section), _) => Slot {
                section,
                children: Children::ByKey,
            },
            (Children::ByKey, Some(key)) => Slot::for_key(key),
            (Children::ByKey, None) => Slot::ROOT,
        }
    }
}

/// Bundle every external reference reachable from `root` (loaded from `entry`).
pub(crate) fn bundle(
    mut root: Value,
    entry: &Path,
    loader: &dyn DocumentLoader,
) -> Result<Value, NormalizeError> {
    let entry = normalize_path(entry);
    let mut bundler = Bundler::new(&root, entry.clone(), loader);
    bundler.walk(&mut root, &entry, Slot::ROOT)?;
    bundler.merge_into(&mut root);
    Ok(root)
}

struct Bundler<'l> {
    loader: &'l dyn DocumentLoader,
    root_file: PathBuf,
    documents: HashMap<PathBuf, Value>,
    assigned: HashMap<(PathBuf, String), String>,
    taken: HashSet<(Section, String)>,
    additions: IndexMap<Section, IndexMap<String, Value>>,
}

impl<'l> Bundler<'l> {
    fn new(root: &Value, root_file: PathBuf, loader: &'l dyn DocumentLoader) -> Self {
        let mut taken = HashSet::new();
        if let Some(components) = root.get("components").and_then(Value::as_object) {
            for section in Section::ALL {
                if let Some(entries) = components.get(section.key()).and_then(Value::as_object) {
                    taken.extend(entries.keys().map(|name| (section, name.clone())));
                }
            }
        }
        Self {
            loader,
            root_file,
            documents: HashMap::new(),
            assigned: HashMap::new(),
            taken,
            additions: IndexMap::new(),
        }
    }

    fn walk(&mut self, value: &mut Value, file: &Path, slot: Slot) -> Result<(), NormalizeError> {
        match value {
            Value::Object(map) => {
                if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
                    let reference = reference.to_string();
                    if let Some(local) = self.localize(&reference, file, slot.section)? {
                        map.insert("$ref".to_string(), Value::String(local));
                    }
                    return Ok(());
                }
                for (key, child) in map.iter_mut() {
                    self.walk(child, file, slot.child(Some(key)))?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.walk(item, file, slot.child(None))?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Map a reference found in `file` to a reference into the root document.
    /// `None` means the reference is already local to the root and stays as it is.
    fn localize(
        &mut self,
        reference: &str,
        file: &Path,
        section: Section,
    ) -> Result<Option<String>, NormalizeError> {
        let (file_part, pointer) = reference.split_once('#').unwrap_or((reference, ""));
        if !pointer.is_empty() && !pointer.starts_with('/') {
            return Err(NormalizeError::InvalidRefFormat(reference.to_string()));
        }

        let target_file = if file_part.is_empty() {
            file.to_path_buf()
        } else {
            let base = file.parent().unwrap_or_else(|| Path::new(""));
            normalize_path(&base.join(file_part))
        };

        if target_file == self.root_file {
            if file_part.is_empty() {
                return Ok(None);
            }
            if pointer.is_empty() {
                return Err(NormalizeError::InvalidRefFormat(reference.to_string()));
            }
            return Ok(Some(format!("#{pointer}")));
        }

        let key = (target_file.clone(), pointer.to_string());
        if let Some(local) = self.assigned.get(&key) {
            return Ok(Some(local.clone()));
        }

        let (section, name) = self.allocate(&target_file, pointer, section);
        let local = format!(
            "#/components/{}/{}",
            section.key(),
            name.replace('~', "~0").replace('/', "~1")
        );
        self.assigned.insert(key, local.clone());
        log::debug!("bundling {reference} as {local}");

        let mut target = self.fetch(&target_file, pointer, reference)?;
        self.walk(
            &mut target,
            &target_file,
            Slot {
                section,
                children: Children::ByKey,
            },
        )?;
        self.additions
            .entry(section)
            .or_default()
            .insert(name, target);
        Ok(Some(local))
    }

    /// Pick the section and a free component name for a bundled target.
    fn allocate(&mut self, file: &Path, pointer: &str, fallback: Section) -> (Section, String) {
        let segments: Vec<String> = pointer
            .split('/')
            .skip(1)
            .map(|s| s.replace("~1", "/").replace("~0", "~"))
            .collect();

        let (section, base) = match segments.as_slice() {
            [components, section, name]
                if components == "components" && Section::from_key(section).is_some() =>
            {
                (Section::from_key(section).unwrap_or(fallback), name.clone())
            }
            [.., last] if !last.is_empty() => (fallback, last.clone()),
            _ => (
                fallback,
                file.file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("External")
                    .to_string(),
            ),
        };

        let mut name = base.clone();
        let mut suffix = 2;
        while self.taken.contains(&(section, name.clone())) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.taken.insert((section, name.clone()));
        (section, name)
    }

    fn fetch(
        &mut self,
        file: &Path,
        pointer: &str,
        reference: &str,
    ) -> Result<Value, NormalizeError> {
        if !self.documents.contains_key(file) {
            let document = self.loader.load(file)?;
            self.documents.insert(file.to_path_buf(), document);
        }
        self.documents
            .get(file)
            .and_then(|document| document.pointer(pointer))
            .cloned()
            .ok_or_else(|| NormalizeError::ExternalRefNotFound {
                reference: reference.to_string(),
                file: file.to_path_buf(),
            })
    }

    fn merge_into(self, root: &mut Value) {
        if self.additions.is_empty() {
            return;
        }
        let Some(root) = root.as_object_mut() else {
            return;
        };
        let components = root
            .entry("components")
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(components) = components.as_object_mut() else {
            return;
        };
        for (section, entries) in self.additions {
            let target = components
                .entry(section.key())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Some(target) = target.as_object_mut() {
                target.extend(entries);
            }
        }
    }
}

/// Lexically resolve `.` and `..` so the same file always gets the same key.
fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
