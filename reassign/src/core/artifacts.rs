//! Per-batch JSON documents handed to the reassignment tool by path.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::common::topic_partition::{ReplicaPlan, TopicsToMove};

use super::{
    err::{ReassignError, ReassignResult},
    status::GeneratedPlans,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    TopicsToMove,
    Reassignment,
    Rollback,
}

impl ArtifactKind {
    pub fn file_name(&self, batch_id: usize) -> String {
        let stem = match self {
            ArtifactKind::TopicsToMove => "topics-to-move",
            ArtifactKind::Reassignment => "reassignment",
            ArtifactKind::Rollback => "rollback",
        };
        format!("{}-{}.json", stem, batch_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    dir: PathBuf,
}

impl ArtifactPaths {
    pub fn init(dir: &Path) -> ArtifactPaths {
        ArtifactPaths {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, kind: ArtifactKind, batch_id: usize) -> PathBuf {
        self.dir.join(kind.file_name(batch_id))
    }
}

pub trait ArtifactStore: Send + Sync {
    fn write(&self, kind: ArtifactKind, batch_id: usize, contents: &str) -> ReassignResult<()>;

    fn write_topics_to_move(&self, batch_id: usize, topics: &[String]) -> ReassignResult<()> {
        let doc = serde_json::to_string_pretty(&TopicsToMove::init(topics))?;
        self.write(ArtifactKind::TopicsToMove, batch_id, &doc)
    }

    fn write_plan(&self, kind: ArtifactKind, batch_id: usize, plan: &ReplicaPlan) -> ReassignResult<()> {
        let doc = serde_json::to_string_pretty(plan)?;
        self.write(kind, batch_id, &doc)
    }

    /// Stores the generate phase's documents verbatim: the current assignment
    /// becomes the rollback plan, the proposal becomes the reassignment plan.
    fn write_generated(&self, batch_id: usize, generated: &GeneratedPlans) -> ReassignResult<()> {
        self.write(ArtifactKind::Rollback, batch_id, &generated.current)?;
        self.write(ArtifactKind::Reassignment, batch_id, &generated.proposed)
    }
}

pub struct FileArtifactStore {
    paths: ArtifactPaths,
}

impl FileArtifactStore {
    pub fn init(paths: ArtifactPaths) -> FileArtifactStore {
        FileArtifactStore { paths }
    }
}

impl ArtifactStore for FileArtifactStore {
    fn write(&self, kind: ArtifactKind, batch_id: usize, contents: &str) -> ReassignResult<()> {
        let path = self.paths.path(kind, batch_id);
        fs::create_dir_all(self.paths.dir()).map_err(|source| ReassignError::ArtifactWrite {
            path: self.paths.dir().to_path_buf(),
            source,
        })?;
        fs::write(&path, contents).map_err(|source| ReassignError::ArtifactWrite {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote artifact");
        Ok(())
    }
}

#[cfg(test)]
mod artifact_tests {
    use std::{fs, path::Path};

    use crate::common::topic_partition::{PartitionReplicas, ReplicaPlan};
    use crate::core::status::GeneratedPlans;

    use super::{ArtifactKind, ArtifactPaths, ArtifactStore, FileArtifactStore};

    #[test]
    fn templated_paths() {
        let paths = ArtifactPaths::init(Path::new("/tmp/job"));
        assert_eq!(
            paths.path(ArtifactKind::TopicsToMove, 0),
            Path::new("/tmp/job/topics-to-move-0.json")
        );
        assert_eq!(
            paths.path(ArtifactKind::Reassignment, 7),
            Path::new("/tmp/job/reassignment-7.json")
        );
        assert_eq!(
            paths.path(ArtifactKind::Rollback, 12),
            Path::new("/tmp/job/rollback-12.json")
        );
    }

    #[test]
    fn writes_indented_plan() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::init(ArtifactPaths::init(dir.path()));
        let plan = ReplicaPlan::init(vec![PartitionReplicas::init("t1", 0, vec![3, 4, 5])]);
        store.write_plan(ArtifactKind::Reassignment, 2, &plan).unwrap();

        let written = fs::read_to_string(dir.path().join("reassignment-2.json")).unwrap();
        assert!(written.contains('\n'));
        let version = written.find("\"version\"").unwrap();
        let partitions = written.find("\"partitions\"").unwrap();
        assert!(version < partitions);
        let topic = written.find("\"topic\"").unwrap();
        let partition = written.find("\"partition\":").unwrap();
        let replicas = written.find("\"replicas\"").unwrap();
        assert!(topic < partition && partition < replicas);
        assert_eq!(serde_json::from_str::<ReplicaPlan>(&written).unwrap(), plan);
    }

    #[test]
    fn writes_topics_to_move() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::init(ArtifactPaths::init(dir.path()));
        store
            .write_topics_to_move(0, &["t1".to_string(), "t2".to_string()])
            .unwrap();
        let written = fs::read_to_string(dir.path().join("topics-to-move-0.json")).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(doc["topics"][1]["topic"], "t2");
    }

    #[test]
    fn generated_split_into_rollback_and_reassignment() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileArtifactStore::init(ArtifactPaths::init(dir.path()));
        let generated = GeneratedPlans {
            current: "{\"current\":1}".to_string(),
            proposed: "{\"proposed\":1}".to_string(),
        };
        store.write_generated(4, &generated).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("rollback-4.json")).unwrap(),
            generated.current
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("reassignment-4.json")).unwrap(),
            generated.proposed
        );
    }

    #[test]
    fn unwritable_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let store = FileArtifactStore::init(ArtifactPaths::init(&blocker.join("sub")));
        assert!(store.write(ArtifactKind::Rollback, 0, "{}").is_err());
    }
}
