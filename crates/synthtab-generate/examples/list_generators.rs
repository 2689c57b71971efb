use synthtab_generate::GeneratorRegistry;

fn main() {
    let registry = GeneratorRegistry::new();
    for (dtype, id) in registry.entries() {
        println!("{dtype}\t{id}");
    }
}
