use serde::{Deserialize, Serialize};

/// Post category. Posts reference it by id; deleting a topic leaves the
/// reference dangling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl TopicPatch {
    pub fn apply(self, topic: &mut Topic) {
        if let Some(name) = self.name {
            topic.name = name;
        }
        if let Some(slug) = self.slug {
            topic.slug = slug;
        }
    }
}
