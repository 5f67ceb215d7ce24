use std::collections::BTreeMap;

pub struct TagRef<'a> {
  pub name: &'a String,
  pub value: &'a Option<String>,
}

/// Read access to the namespaced extension elements of an item, e.g.
/// `dcterms:modified`, flattened across nesting levels.
pub trait ExtensionExt {
  fn tags(&self) -> Vec<TagRef<'_>>;

  fn tags_with_names(&self, names: &[&str]) -> Vec<TagRef<'_>> {
    self
      .tags()
      .into_iter()
      .filter(|tag| names.contains(&tag.name.as_str()))
      .collect()
  }
}

impl ExtensionExt for rss::extension::Extension {
  fn tags(&self) -> Vec<TagRef<'_>> {
    let tag = TagRef {
      name: &self.name,
      value: &self.value,
    };

    let mut tags = vec![tag];
    for children in self.children.values() {
      tags.extend(children.iter().flat_map(|ext| ext.tags()));
    }
    tags
  }
}

impl<T> ExtensionExt for BTreeMap<String, BTreeMap<String, Vec<T>>>
where
  T: ExtensionExt,
{
  fn tags(&self) -> Vec<TagRef<'_>> {
    self
      .values()
      .flat_map(|children| {
        children
          .values()
          .flat_map(|exts| exts.iter().flat_map(|ext| ext.tags()))
      })
      .collect()
  }
}
