use std::fs::ReadDir;
use std::path::PathBuf;

use crate::label::Label;

use super::{DatasetArgs, FileFilter, Sample};

/// Enumerates labeled samples under a dataset root.
///
/// Every call to [`DatasetWalker::samples`] starts a fresh pass over the
/// `normal/` then `nsfw/` folders. Directories are read while iterating.
#[derive(Debug, Clone)]
pub struct DatasetWalker {
    root: PathBuf,
    max_per_class: usize,
    file_filter: FileFilter,
}

impl DatasetWalker {
    pub fn new(args: &DatasetArgs) -> Self {
        Self {
            root: args.root.clone(),
            max_per_class: args.max_per_class,
            file_filter: args.file_filter,
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn class_dir(&self, label: Label) -> PathBuf {
        self.root.join(label.dir_name())
    }

    /// Classes whose folder does not exist under the root.
    pub fn missing_classes(&self) -> Vec<Label> {
        Label::ALL
            .into_iter()
            .filter(|&label| !self.class_dir(label).is_dir())
            .collect()
    }

    /// Start a new enumeration from the first class.
    pub fn samples(&self) -> Samples<'_> {
        Samples {
            walker: self,
            class_idx: 0,
            entries: None,
            taken: 0,
        }
    }

    /// Number of samples a full pass would yield.
    pub fn count_samples(&self) -> usize {
        self.samples().count()
    }

    fn open_class_dir(&self, label: Label) -> Option<ReadDir> {
        let dir = self.class_dir(label);
        match std::fs::read_dir(&dir) {
            Ok(entries) => Some(entries),
            Err(e) => {
                tracing::debug!("Cannot read {} folder {:?}: {}", label, dir, e);
                None
            }
        }
    }
}

/// Lazy iterator over one pass of a [`DatasetWalker`]
#[derive(Debug)]
pub struct Samples<'a> {
    walker: &'a DatasetWalker,
    class_idx: usize,
    entries: Option<ReadDir>,
    taken: usize,
}

impl Samples<'_> {
    fn next_class(&mut self) {
        self.class_idx += 1;
        self.entries = None;
        self.taken = 0;
    }
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let label = *Label::ALL.get(self.class_idx)?;

            if self.taken >= self.walker.max_per_class {
                self.next_class();
                continue;
            }

            if self.entries.is_none() {
                match self.walker.open_class_dir(label) {
                    Some(entries) => self.entries = Some(entries),
                    None => {
                        self.next_class();
                        continue;
                    }
                }
            }

            let entry = match self.entries.as_mut().and_then(Iterator::next) {
                Some(entry) => entry,
                None => {
                    self.next_class();
                    continue;
                }
            };

            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {} folder: {}", label, e);
                    continue;
                }
            };

            if self.walker.file_filter.accepts(&path) {
                self.taken += 1;
                return Some(Sample { path, label });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"img").unwrap();
    }

    fn make_dataset(normal: &[&str], nsfw: Option<&[&str]>) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let normal_dir = temp_dir.path().join("normal");
        fs::create_dir(&normal_dir).unwrap();
        for name in normal {
            touch(&normal_dir, name);
        }
        if let Some(nsfw) = nsfw {
            let nsfw_dir = temp_dir.path().join("nsfw");
            fs::create_dir(&nsfw_dir).unwrap();
            for name in nsfw {
                touch(&nsfw_dir, name);
            }
        }
        temp_dir
    }

    fn walker_for(root: &Path, max_per_class: usize, file_filter: FileFilter) -> DatasetWalker {
        DatasetWalker::new(&DatasetArgs {
            root: root.to_path_buf(),
            max_per_class,
            file_filter,
        })
    }

    #[test]
    fn test_walker_labels_by_folder_normal_first() {
        let dataset = make_dataset(&["a.jpg", "b.png"], Some(&["c.jpeg"]));
        let walker = walker_for(dataset.path(), 1000, FileFilter::Images);

        let samples: Vec<Sample> = walker.samples().collect();
        assert_eq!(samples.len(), 3);
        assert!(samples[..2].iter().all(|s| s.label == Label::Normal));
        assert_eq!(samples[2].label, Label::Nsfw);
        assert_eq!(samples[2].file_name(), "c.jpeg");
    }

    #[test]
    fn test_walker_filters_by_extension() {
        let dataset = make_dataset(&["a.JPG", "notes.txt", "b.webp"], Some(&["c.png", "d"]));

        let images = walker_for(dataset.path(), 1000, FileFilter::Images);
        assert_eq!(images.count_samples(), 2);

        let any = walker_for(dataset.path(), 1000, FileFilter::AnyFile);
        assert_eq!(any.count_samples(), 5);
    }

    #[test]
    fn test_walker_caps_each_class_in_directory_order() {
        let temp_dir = TempDir::new().unwrap();
        let nsfw_dir = temp_dir.path().join("nsfw");
        fs::create_dir(&nsfw_dir).unwrap();
        for i in 0..1500 {
            touch(&nsfw_dir, &format!("img_{i:04}.jpg"));
        }
        let normal_dir = temp_dir.path().join("normal");
        fs::create_dir(&normal_dir).unwrap();
        for i in 0..20 {
            touch(&normal_dir, &format!("img_{i:04}.png"));
        }

        let walker = walker_for(temp_dir.path(), 1000, FileFilter::Images);
        let nsfw: Vec<PathBuf> = walker
            .samples()
            .filter(|s| s.label == Label::Nsfw)
            .map(|s| s.path)
            .collect();

        let expected: Vec<PathBuf> = fs::read_dir(&nsfw_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .take(1000)
            .collect();

        assert_eq!(nsfw.len(), 1000);
        assert_eq!(nsfw, expected);
        // cap applies per class, not globally
        assert_eq!(walker.count_samples(), 1020);
    }

    #[test]
    fn test_walker_cap_counts_only_accepted_files() {
        let dataset = make_dataset(&["a.txt", "b.txt", "c.jpg", "d.jpg", "e.jpg"], Some(&[]));
        let walker = walker_for(dataset.path(), 2, FileFilter::Images);
        assert_eq!(walker.count_samples(), 2);
    }

    #[test]
    fn test_walker_missing_class_folder_yields_nothing() {
        let dataset = make_dataset(&["a.jpg", "b.jpg"], None);
        let walker = walker_for(dataset.path(), 1000, FileFilter::Images);

        assert_eq!(walker.missing_classes(), vec![Label::Nsfw]);
        let samples: Vec<Sample> = walker.samples().collect();
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|s| s.label == Label::Normal));
    }

    #[test]
    fn test_walker_missing_root() {
        let walker = walker_for(Path::new("/nonexistent/dataset"), 1000, FileFilter::Images);
        assert_eq!(walker.missing_classes(), Label::ALL.to_vec());
        assert_eq!(walker.count_samples(), 0);
    }

    #[test]
    fn test_walker_is_restartable() {
        let dataset = make_dataset(&["a.jpg"], Some(&["b.jpg", "c.jpg"]));
        let walker = walker_for(dataset.path(), 1000, FileFilter::Images);

        let mut first = walker.samples();
        assert!(first.next().is_some());

        let again: Vec<Sample> = walker.samples().collect();
        let full: Vec<Sample> = walker.samples().collect();
        assert_eq!(again.len(), 3);
        assert_eq!(again, full);
    }
}
