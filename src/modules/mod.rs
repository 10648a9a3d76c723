pub mod books;

use bookly_kernel::ModuleRegistry;

use books::repository::SharedBookRepository;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, books: SharedBookRepository) {
    registry.register(books::create_module(books));
}
