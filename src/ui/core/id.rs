use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of a component in the arena. Stays unique after the
    /// component is torn down; lookups on a removed id simply miss.
    pub struct ComponentId;
}
