use std::io::{self, Write};

pub const INSTRUCTIONS: &str = "\
📚 Instructions for a custom sound:

1. Download a sound from:
   - https://notificationsounds.com/
   - https://freesound.org/
   - https://mixkit.co/free-sound-effects/

2. Recommended characteristics:
   - Format: MP3 or OGG
   - Duration: 0.5 - 1 second
   - Size: < 50 KB
   - Quality: 128 kbps

3. Rename the file to: notification-sound.mp3

4. Put it in the root folder of your site

5. Change the path in pwa-manager-optimized.js if needed:
   soundUrl: '/path/to/your/sound.mp3'
";

pub const INSTALL_GUIDANCE: &str = "\
Installation:
  Ubuntu/Debian: sudo apt-get install sox libsox-fmt-mp3
  macOS: brew install sox
  or download an audio file from:
  - https://notificationsounds.com/
  - https://freesound.org/
";

pub fn write_instructions<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    out.write_all(INSTRUCTIONS.as_bytes())
}

pub fn write_install_guidance<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "❌ sox or ffmpeg is required to generate the audio")?;
    out.write_all(INSTALL_GUIDANCE.as_bytes())
}
