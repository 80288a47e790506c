use flagstore::{
    permission::bits, BoundedFlags, FlagRecord, FlagStore, Permission, PermissionSet, Tier,
    TieredFlags,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Named permissions packed into one word, as stored in a record field
    let editor = Permission::Read | Permission::Write;
    let admin = PermissionSet::all();
    println!("editor = {editor} ({:#06b})", editor.bits());
    println!("admin  = {admin} ({:#06b})", admin.bits());

    let stored = editor.bits();
    let loaded = PermissionSet::from_bits(stored)?;
    println!("loaded {loaded}; may delete: {}", loaded.has(Permission::Delete));
    println!("admin covers editor: {}", admin.contains_all(editor));
    assert_eq!(stored & bits::WRITE, bits::WRITE);

    // The same word viewed as a bounded flag store
    let flags = BoundedFlags::<u32>::from(editor);
    println!("flag indices: {:?}", flags.ones());

    // Bounded walkthrough: capacity 128, flag 70
    let mut flags = TieredFlags::new(Tier::Bounded, 128);
    flags.set(70)?;
    println!("record after set(70): {}", FlagRecord::from_flags(&flags).to_json()?);
    flags.clear(70);
    println!("test(70) after clear: {}", flags.test(70));

    // Unbounded store needs no capacity up front
    let mut flags = TieredFlags::new(Tier::Unbounded, 0);
    flags.set(1000)?;
    println!("record after set(1000): {}", FlagRecord::from_flags(&flags).to_json()?);

    Ok(())
}
