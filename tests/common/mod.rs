//! Shared fixtures: the RFC 3526 2048-bit MODP group with pinned expected values

#![allow(dead_code)]

use zkelgamal::{BigNum, CryptoSystem, KeyPair};

/// RFC 3526 group 14 prime, `p = 2q + 1`
pub const P: &str = "3231700607131100730033891392642382824881794124114023911284200975140074170663\
    4354222619689417363569347117901737909704191754605873209195028853758986185622\
    1532121754125149017745202702357960782362488842461894775876411059286460994117\
    2324542662252219323054091903768052423551912567971587011700105805587765103886\
    1847280257976054903569732561526167081339361799541336476559160368317896729073\
    1783845896806396719009772021941686472258710314113364293195361934716365332097\
    1707744822798858856536920864529663607725026895550592836275112117409697299806\
    8410554359584866583291642136218231078990999448652468262416972035911852507045\
    361090559";

pub const Q: &str = "1615850303565550365016945696321191412440897062057011955642100487570037085331\
    7177111309844708681784673558950868954852095877302936604597514426879493092811\
    0766060877062574508872601351178980391181244421230947387938205529643230497058\
    6162271331126109661527045951884026211775956283985793505850052902793882551943\
    0923640128988027451784866280763083540669680899770668238279580184158948364536\
    5891922948403198359504886010970843236129355157056682146597680967358182666048\
    5853872411399429428268460432264831803862513447775296418137556058704848649903\
    4205277179792433291645821068109115539495499724326234131208486017955926253522\
    680545279";

pub const G: &str = "2";

pub const X: &str = "12345678901234567890";

/// `g^X mod p`
pub const EXPECTED_Y: &str = "3199531733175833999206099719060364283082680870764911249938305252816090872741\
    7492473872655903227196198153373870259935840266508809826816957239219715143021\
    4877842028417198735758018171266246124077252347144008119436376475487143667182\
    0434446267625433376599218353374387146832880194746101062978859678587804029414\
    6182728559816674425854327943947858629016404898595798888512915920867453037016\
    8022040518061488370757663449884373007095522716152944564818572019490569773946\
    9453026129957905435260282224037623067640008020514590883089379514906346830403\
    5454328327464504752034916054203213486845457551318472750730391687507217024725\
    226002401";

pub const MESSAGE: u64 = 12345;
pub const R: u64 = 54321;

/// `g^R mod p`
pub const EXPECTED_ALPHA: &str = "2636437325611556196121320429057959641786643626099416022112347345212632491786\
    5590001967154446729558162452284020424826293394419129906263935612963489225718\
    1889175062525683485924553449438327068804739053239845341199826620360355854971\
    5484291370343418741153309502980607753879427031909388587246213116754648513844\
    9751659246605310552391425408267848884794325995853499482513918265689407566629\
    5552770464470274746217529207243464061976907810264901199851057218832894418783\
    2372498538374252605202497393481343049672488298646977730069747198698035453049\
    2202633620652805084636384863244348066945892420918273565992279643488378838884\
    380141813";

/// `y^R * MESSAGE mod p`
pub const EXPECTED_BETA: &str = "2790597405757230984201753654517571875067391021397512601820007934661712505070\
    6741671747375025468665456826953179937672010958565133650701953762525875197734\
    8513468640496478384103637313317764245077037529741560852994835112351531767517\
    7296370565525194494337860966041517946241094060438412360229165973348908099660\
    4868882729892815424019867869039552582325627691905494156740491613137219581775\
    9339833086485272455817222183892425250032105855250925960948957094705296802687\
    7934043374168626013073939129359381743245857881811910897067314983226323762144\
    0524512607764884866767521964169837968949878717204427338324515487943963718914\
    413199808";

pub const EXPECTED_FINGERPRINT: &str = "45:F9:0D:5D:30:DF:49:E4:31:3A:51:D3:58:BC:54:D4:90:51:F1:B2";

pub const HELLO_HASH: &str = "975987071262755080377722350727279193143145743181";

pub fn num(s: &str) -> BigNum {
    s.parse().unwrap()
}

pub fn params() -> CryptoSystem {
    CryptoSystem::new(num(P), num(Q), num(G))
}

pub fn fixed_keypair() -> KeyPair {
    KeyPair::create_with_private_key(&params(), num(X)).unwrap()
}
