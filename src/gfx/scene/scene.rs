use super::folders::{FolderSet, FolderState};
use super::object::{ObjectId, SceneObject, DEFAULT_FOLDER};

/// One mesh to draw, addressed by object index and mesh index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderItem {
    pub object: usize,
    pub mesh: usize,
}

/// Ordered list of scene objects plus the folder set that groups them.
///
/// Objects are only added or removed through [`Scene::push_object`],
/// [`Scene::remove_object`] and [`Scene::clear`]; each of these rebuilds the
/// render list so the renderer never sees a stale index.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<SceneObject>,
    folders: FolderSet,
    render_list: Vec<RenderItem>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Mutable access to each object without allowing insertion or removal.
    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut SceneObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get_object(&self, index: usize) -> Option<&SceneObject> {
        self.objects.get(index)
    }

    pub fn get_object_mut(&mut self, index: usize) -> Option<&mut SceneObject> {
        self.objects.get_mut(index)
    }

    /// Current index of the object with the given id.
    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|object| object.id() == id)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.objects.iter().any(|object| object.name == name)
    }

    /// Appends an object, assigning it a fresh id and making sure its folder
    /// exists. Returns the new index.
    pub fn push_object(&mut self, mut object: SceneObject) -> usize {
        self.next_id += 1;
        object.assign_id(ObjectId(self.next_id));
        self.folders.ensure(object.folder());
        self.objects.push(object);
        self.rebuild_render_list();
        self.objects.len() - 1
    }

    /// Releases the object's GPU resources and removes it.
    /// Out-of-range indices are ignored.
    pub fn remove_object(&mut self, index: usize) -> Option<SceneObject> {
        if index >= self.objects.len() {
            return None;
        }
        let mut object = self.objects.remove(index);
        object.destroy();
        self.rebuild_render_list();
        Some(object)
    }

    /// Removes every object, releasing GPU resources. Folders are kept.
    pub fn clear(&mut self) {
        for object in &mut self.objects {
            object.destroy();
        }
        self.objects.clear();
        self.rebuild_render_list();
    }

    pub fn update(&mut self, dt: f32) {
        for object in &mut self.objects {
            object.update(dt);
        }
    }

    pub fn render_list(&self) -> &[RenderItem] {
        &self.render_list
    }

    fn rebuild_render_list(&mut self) {
        self.render_list = self
            .objects
            .iter()
            .enumerate()
            .flat_map(|(object, o)| (0..o.meshes().len()).map(move |mesh| RenderItem { object, mesh }))
            .collect();
    }

    // Folder management

    pub fn folders(&self) -> &FolderSet {
        &self.folders
    }

    pub fn ensure_folder(&mut self, name: &str) -> bool {
        self.folders.ensure(name)
    }

    pub fn toggle_folder(&mut self, name: &str) {
        self.folders.toggle(name);
    }

    pub fn folder_state(&self, name: &str) -> Option<FolderState> {
        self.folders.get(name)
    }

    /// Moves an object into a folder, creating the folder if needed.
    pub fn set_object_folder(&mut self, index: usize, folder: &str) -> bool {
        let folder = folder.trim();
        if folder.is_empty() {
            return false;
        }
        let Some(object) = self.objects.get_mut(index) else {
            return false;
        };
        if object.folder() == folder {
            return false;
        }
        object.assign_folder(folder.to_string());
        self.folders.ensure(folder);
        true
    }

    /// Deletes a folder, moving its objects back to the default folder.
    pub fn delete_folder(&mut self, name: &str) -> bool {
        if !self.folders.remove(name) {
            return false;
        }
        for object in &mut self.objects {
            if object.folder() == name {
                object.assign_folder(DEFAULT_FOLDER.to_string());
            }
        }
        true
    }

    /// Indices of the objects in a folder, in scene order.
    pub fn objects_in_folder<'a>(&'a self, name: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.objects
            .iter()
            .enumerate()
            .filter(move |(_, object)| object.folder() == name)
            .map(|(i, _)| i)
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let meshes = self.objects.iter().flat_map(|obj| obj.meshes());
        SceneStatistics {
            object_count: self.objects.len(),
            light_count: self.objects.iter().filter(|obj| obj.is_light()).count(),
            folder_count: self.folders.len(),
            total_triangles: meshes.clone().map(|m| m.geometry().draw_count() / 3).sum(),
            total_vertices: meshes.map(|m| m.geometry().vertex_count() as u32).sum(),
        }
    }
}

/// Scene statistics for logging and HUD display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub light_count: usize,
    pub folder_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::object::PrimitiveKind;

    fn cube(name: &str) -> SceneObject {
        SceneObject::primitive(name, PrimitiveKind::Cube, None)
    }

    #[test]
    fn test_push_creates_missing_folder() {
        let mut scene = Scene::new();
        scene.push_object(cube("a").with_folder("Props"));
        assert!(scene.folders().contains("Props"));
    }

    #[test]
    fn test_render_list_tracks_objects() {
        let mut scene = Scene::new();
        scene.push_object(cube("a"));
        scene.push_object(cube("b"));
        assert_eq!(scene.render_list().len(), 2);

        scene.remove_object(0);
        assert_eq!(scene.render_list(), &[RenderItem { object: 0, mesh: 0 }]);
        assert_eq!(scene.objects()[0].name, "b");
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut scene = Scene::new();
        scene.push_object(cube("a"));
        assert!(scene.remove_object(5).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ids_are_stable_across_removal() {
        let mut scene = Scene::new();
        scene.push_object(cube("a"));
        scene.push_object(cube("b"));
        let b = scene.objects()[1].id();

        scene.remove_object(0);
        assert_eq!(scene.index_of(b), Some(0));
    }

    #[test]
    fn test_delete_folder_moves_objects_home() {
        let mut scene = Scene::new();
        let i = scene.push_object(cube("a"));
        scene.set_object_folder(i, "Props");

        assert!(scene.delete_folder("Props"));
        assert_eq!(scene.objects()[0].folder(), DEFAULT_FOLDER);
        assert!(!scene.delete_folder(DEFAULT_FOLDER));
    }
}
