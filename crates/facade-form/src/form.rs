//! The live form: simple groups, profile lists and categories

use crate::catalog::ProfileCatalog;
use crate::error::FormError;
use crate::field::{Control, Field};
use crate::group::GroupInstance;
use crate::templates::{self, GroupKind};
use serde::Serialize;
use std::fmt;

/// Address of one repeatable list.
///
/// Written as `alum_profiles`, `steel_profiles` or
/// `categories.<index>.<list>` where `<list>` is one of `glass_units`,
/// `frames`, `connections`, `anchorage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRef {
    Top(GroupKind),
    Category { category: usize, kind: GroupKind },
}

impl ListRef {
    pub fn parse(path: &str) -> Result<Self, FormError> {
        let unknown = || FormError::UnknownList(path.to_string());
        let parts: Vec<&str> = path.split('.').collect();
        match parts.as_slice() {
            [key] => match GroupKind::from_list_key(key) {
                Some(kind @ (GroupKind::AlumProfile | GroupKind::SteelProfile)) => {
                    Ok(ListRef::Top(kind))
                }
                _ => Err(unknown()),
            },
            ["categories", index, key] => {
                let category = index.parse().map_err(|_| unknown())?;
                match GroupKind::from_list_key(key) {
                    Some(kind) if GroupKind::CATEGORY_ITEMS.contains(&kind) => {
                        Ok(ListRef::Category { category, kind })
                    }
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }

    pub fn kind(self) -> GroupKind {
        match self {
            ListRef::Top(kind) | ListRef::Category { kind, .. } => kind,
        }
    }

    /// Editing this field rebuilds the instance's field set.
    pub fn is_discriminator(self, name: &str) -> bool {
        self.kind().discriminator() == Some(name)
    }
}

impl fmt::Display for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRef::Top(kind) => f.write_str(kind.list_key()),
            ListRef::Category { category, kind } => {
                write!(f, "categories.{}.{}", category, kind.list_key())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: Field,
    pub glass_units: Vec<GroupInstance>,
    pub frames: Vec<GroupInstance>,
    pub connections: Vec<GroupInstance>,
    pub anchorage: Vec<GroupInstance>,
}

impl Category {
    /// New category with one blank item in each sub-list.
    pub fn new(catalog: &ProfileCatalog) -> Self {
        let one = |kind| vec![GroupInstance::new(kind, catalog)];
        Self {
            name: Field::new("category_name", "Category Name", Control::Text),
            glass_units: one(GroupKind::GlassUnit),
            frames: one(GroupKind::Frame),
            connections: one(GroupKind::Connection),
            anchorage: one(GroupKind::Anchorage),
        }
    }

    pub fn list(&self, kind: GroupKind) -> Option<&Vec<GroupInstance>> {
        match kind {
            GroupKind::GlassUnit => Some(&self.glass_units),
            GroupKind::Frame => Some(&self.frames),
            GroupKind::Connection => Some(&self.connections),
            GroupKind::Anchorage => Some(&self.anchorage),
            _ => None,
        }
    }

    pub fn list_mut(&mut self, kind: GroupKind) -> Option<&mut Vec<GroupInstance>> {
        match kind {
            GroupKind::GlassUnit => Some(&mut self.glass_units),
            GroupKind::Frame => Some(&mut self.frames),
            GroupKind::Connection => Some(&mut self.connections),
            GroupKind::Anchorage => Some(&mut self.anchorage),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub(crate) simple: Vec<Field>,
    pub(crate) alum_profiles: Vec<GroupInstance>,
    pub(crate) steel_profiles: Vec<GroupInstance>,
    pub(crate) categories: Vec<Category>,
}

impl Form {
    /// Page-load form: one aluminum profile, one steel profile and one
    /// category.
    pub fn new(catalog: &ProfileCatalog) -> Self {
        Self {
            simple: templates::simple_fields(),
            alum_profiles: vec![GroupInstance::new(GroupKind::AlumProfile, catalog)],
            steel_profiles: vec![GroupInstance::new(GroupKind::SteelProfile, catalog)],
            categories: vec![Category::new(catalog)],
        }
    }

    /// Form with the given simple fields and no list instances.
    pub fn with_simple_fields(simple: Vec<Field>) -> Self {
        Self {
            simple,
            alum_profiles: Vec::new(),
            steel_profiles: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn simple_fields(&self) -> &[Field] {
        &self.simple
    }

    pub fn simple_field(&self, name: &str) -> Option<&Field> {
        self.simple.iter().find(|f| f.name == name)
    }

    pub(crate) fn simple_field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.simple.iter_mut().find(|f| f.name == name)
    }

    pub fn set_simple(&mut self, name: &str, value: &str, checked: bool) -> Result<(), FormError> {
        self.simple_field_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?
            .set_from_input(value, checked);
        Ok(())
    }

    pub fn alum_profiles(&self) -> &[GroupInstance] {
        &self.alum_profiles
    }

    pub fn steel_profiles(&self) -> &[GroupInstance] {
        &self.steel_profiles
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, index: usize) -> Result<&Category, FormError> {
        self.categories
            .get(index)
            .ok_or(FormError::CategoryOutOfBounds(index))
    }

    fn category_mut(&mut self, index: usize) -> Result<&mut Category, FormError> {
        self.categories
            .get_mut(index)
            .ok_or(FormError::CategoryOutOfBounds(index))
    }

    pub fn list(&self, list: ListRef) -> Result<&[GroupInstance], FormError> {
        match list {
            ListRef::Top(GroupKind::AlumProfile) => Ok(&self.alum_profiles),
            ListRef::Top(GroupKind::SteelProfile) => Ok(&self.steel_profiles),
            ListRef::Top(_) => Err(FormError::UnknownList(list.to_string())),
            ListRef::Category { category, kind } => self
                .category(category)?
                .list(kind)
                .map(Vec::as_slice)
                .ok_or_else(|| FormError::UnknownList(list.to_string())),
        }
    }

    fn list_mut(&mut self, list: ListRef) -> Result<&mut Vec<GroupInstance>, FormError> {
        match list {
            ListRef::Top(GroupKind::AlumProfile) => Ok(&mut self.alum_profiles),
            ListRef::Top(GroupKind::SteelProfile) => Ok(&mut self.steel_profiles),
            ListRef::Top(_) => Err(FormError::UnknownList(list.to_string())),
            ListRef::Category { category, kind } => self
                .category_mut(category)?
                .list_mut(kind)
                .ok_or_else(|| FormError::UnknownList(list.to_string())),
        }
    }

    pub fn instance(&self, list: ListRef, index: usize) -> Result<&GroupInstance, FormError> {
        self.list(list)?
            .get(index)
            .ok_or_else(|| FormError::ItemOutOfBounds {
                list: list.to_string(),
                index,
            })
    }

    fn instance_mut(
        &mut self,
        list: ListRef,
        index: usize,
    ) -> Result<&mut GroupInstance, FormError> {
        self.list_mut(list)?
            .get_mut(index)
            .ok_or_else(|| FormError::ItemOutOfBounds {
                list: list.to_string(),
                index,
            })
    }

    /// Append a blank instance, returning its index.
    pub fn add_instance(
        &mut self,
        list: ListRef,
        catalog: &ProfileCatalog,
    ) -> Result<usize, FormError> {
        let kind = match list {
            ListRef::Top(kind) | ListRef::Category { kind, .. } => kind,
        };
        let items = self.list_mut(list)?;
        items.push(GroupInstance::new(kind, catalog));
        Ok(items.len() - 1)
    }

    pub fn remove_instance(
        &mut self,
        list: ListRef,
        index: usize,
    ) -> Result<GroupInstance, FormError> {
        let items = self.list_mut(list)?;
        if index >= items.len() {
            return Err(FormError::ItemOutOfBounds {
                list: list.to_string(),
                index,
            });
        }
        Ok(items.remove(index))
    }

    pub fn set_discriminator(
        &mut self,
        list: ListRef,
        index: usize,
        value: &str,
        catalog: &ProfileCatalog,
    ) -> Result<(), FormError> {
        self.instance_mut(list, index)?
            .set_discriminator(value, catalog);
        Ok(())
    }

    pub fn set_field(
        &mut self,
        list: ListRef,
        index: usize,
        name: &str,
        value: &str,
        checked: bool,
        catalog: &ProfileCatalog,
    ) -> Result<(), FormError> {
        self.instance_mut(list, index)?
            .set_field(name, value, checked, catalog)
    }

    pub fn add_category(&mut self, catalog: &ProfileCatalog) -> usize {
        self.categories.push(Category::new(catalog));
        self.categories.len() - 1
    }

    pub fn remove_category(&mut self, index: usize) -> Result<Category, FormError> {
        if index >= self.categories.len() {
            return Err(FormError::CategoryOutOfBounds(index));
        }
        Ok(self.categories.remove(index))
    }

    pub fn set_category_name(&mut self, index: usize, name: &str) -> Result<(), FormError> {
        self.category_mut(index)?.name.value = name.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_refs() {
        assert_eq!(
            ListRef::parse("alum_profiles"),
            Ok(ListRef::Top(GroupKind::AlumProfile))
        );
        assert_eq!(
            ListRef::parse("categories.2.frames"),
            Ok(ListRef::Category {
                category: 2,
                kind: GroupKind::Frame
            })
        );
        assert!(ListRef::parse("glass_units").is_err());
        assert!(ListRef::parse("categories.x.frames").is_err());
        assert!(ListRef::parse("categories.0.alum_profiles").is_err());
    }

    #[test]
    fn test_list_ref_discriminator() {
        let units = ListRef::parse("categories.0.glass_units").unwrap();
        assert!(units.is_discriminator("glass_type"));
        assert!(!units.is_discriminator("thickness1"));
        let steel = ListRef::Top(GroupKind::SteelProfile);
        assert!(!steel.is_discriminator("profile_type"));
    }

    #[test]
    fn test_list_ref_display_round_trips() {
        let list = ListRef::Category {
            category: 1,
            kind: GroupKind::Anchorage,
        };
        assert_eq!(list.to_string(), "categories.1.anchorage");
        assert_eq!(ListRef::parse(&list.to_string()), Ok(list));
    }

    #[test]
    fn test_default_form_shape() {
        let catalog = ProfileCatalog::default();
        let form = Form::new(&catalog);
        assert_eq!(form.alum_profiles().len(), 1);
        assert_eq!(form.steel_profiles().len(), 1);
        assert_eq!(form.categories().len(), 1);
        let category = &form.categories()[0];
        for kind in GroupKind::CATEGORY_ITEMS {
            assert_eq!(category.list(kind).unwrap().len(), 1);
        }
    }

    #[test]
    fn test_add_and_remove_instances() {
        let catalog = ProfileCatalog::default();
        let mut form = Form::new(&catalog);
        let list = ListRef::parse("categories.0.glass_units").unwrap();
        assert_eq!(form.add_instance(list, &catalog), Ok(1));
        form.set_discriminator(list, 1, "lgu", &catalog).unwrap();
        assert_eq!(form.instance(list, 1).unwrap().variant(), Some("lgu"));

        let removed = form.remove_instance(list, 0).unwrap();
        assert_eq!(removed.variant(), Some("sgu"));
        assert_eq!(form.list(list).unwrap().len(), 1);
        assert!(form.remove_instance(list, 5).is_err());
    }

    #[test]
    fn test_category_bounds() {
        let catalog = ProfileCatalog::default();
        let mut form = Form::new(&catalog);
        assert_eq!(form.add_category(&catalog), 1);
        form.set_category_name(1, "Curtain Wall").unwrap();
        assert_eq!(form.categories()[1].name.value, "Curtain Wall");
        assert_eq!(
            form.remove_category(3).unwrap_err(),
            FormError::CategoryOutOfBounds(3)
        );
        let list = ListRef::Category {
            category: 9,
            kind: GroupKind::Frame,
        };
        assert_eq!(
            form.add_instance(list, &catalog),
            Err(FormError::CategoryOutOfBounds(9))
        );
    }

    #[test]
    fn test_set_simple_checkbox() {
        let catalog = ProfileCatalog::default();
        let mut form = Form::new(&catalog);
        form.set_simple("include.glass_section", "", true).unwrap();
        assert!(form.simple_field("include.glass_section").unwrap().checked);
        assert!(form.set_simple("wind.unknown", "1", false).is_err());
    }
}
